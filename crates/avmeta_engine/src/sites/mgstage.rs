//! MGStage adapter: the detail path derives directly from the code, behind
//! an age-gate cookie; fields sit in a `<th>label</th><td>value</td> ` table.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;

use crate::cookies::Cookie;
use crate::document::anchor_texts;
use crate::extract::{ExprSet, GenericExtractor, SiteScraper};
use crate::session::{Session, SessionSettings};
use crate::sites::normalize_intro;
use crate::types::{ScrapeError, SourceConfig};

pub const SOURCE: &str = "mgstage";

const DEFAULT_SITE: &str = "https://www.mgstage.com";

const EXPR: ExprSet = ExprSet {
    number: "",
    title: "h1.tag",
    studio: "",
    release: "",
    runtime: "",
    director: "",
    actor: "",
    cover: "#EnlargeImage@href",
    extra_fanart: "",
    tags: "",
    user_rating: "",
    outline: "#introduction p.introduction",
    series: "",
};

pub struct MgstageScraper {
    config: SourceConfig,
    extractor: GenericExtractor,
}

impl MgstageScraper {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            extractor: GenericExtractor::new(EXPR),
        }
    }

    fn base(&self) -> &str {
        self.config.site_or(DEFAULT_SITE)
    }

    fn labeled(&self, label: &str) -> String {
        self.extractor
            .with_document(|doc| doc.labeled_text("th", label, "td"))
    }
}

#[async_trait]
impl SiteScraper for MgstageScraper {
    async fn fetch(&mut self, code: &str) -> Result<(), ScrapeError> {
        let number = code.to_uppercase();
        self.extractor.set_number(number.clone());

        let session = Session::new(SessionSettings {
            // Age gate; the page is a stub without it.
            cookies: vec![Cookie::pair("adc", "1")],
            proxy: self.config.proxy().map(str::to_string),
            ..SessionSettings::default()
        })?;

        let detail_url = format!("{}/product/product_detail/{}/", self.base(), number);
        debug!("mgstage fetching {detail_url}");
        let page = session.get(&detail_url).await?;
        self.extractor.set_page(detail_url, page.text());
        Ok(())
    }

    fn uri(&self) -> String {
        self.extractor.uri()
    }

    fn number(&self) -> String {
        self.extractor.number()
    }

    fn title(&self) -> String {
        self.extractor.title()
    }

    fn outline(&self) -> String {
        normalize_intro(&self.extractor.outline())
    }

    // Not published by this source.
    fn director(&self) -> String {
        String::new()
    }

    fn release(&self) -> String {
        self.labeled("配信開始日")
    }

    fn runtime(&self) -> String {
        self.labeled("収録時間")
            .trim_end_matches("min")
            .trim()
            .to_string()
    }

    fn studio(&self) -> String {
        self.labeled("メーカー")
    }

    fn series(&self) -> String {
        self.labeled("シリーズ")
    }

    fn tags(&self) -> Vec<String> {
        self.extractor.with_document(|doc| {
            let Some(cell) = doc.labeled_element("th", "ジャンル", "td") else {
                return Vec::new();
            };
            anchor_texts(&cell)
        })
    }

    fn cover(&self) -> String {
        self.extractor.cover()
    }

    /// Performers are anchors in the cast cell; amateur listings carry a
    /// bare name instead, kept as a single actor.
    fn actors(&self) -> HashMap<String, String> {
        self.extractor.with_document(|doc| {
            let mut actors = HashMap::new();
            let Some(cell) = doc.labeled_element("th", "出演", "td") else {
                return actors;
            };
            let names = anchor_texts(&cell);
            if names.is_empty() {
                let name = crate::document::full_text(&cell);
                if !name.is_empty() {
                    actors.insert(name, String::new());
                }
            } else {
                for name in names {
                    actors.insert(name, String::new());
                }
            }
            actors
        })
    }
}
