//! JavDB adapter: search endpoint, exact-code filtering of the result list,
//! then a detail page whose fields sit in label/value blocks.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use log::{debug, info};
use scraper::ElementRef;

use crate::cookies::import_cookies;
use crate::document::{anchor_texts, full_text, Document};
use crate::extract::{ExprSet, GenericExtractor, SiteScraper};
use crate::session::{Session, SessionSettings};
use crate::types::{FailureKind, ScrapeError, SourceConfig};

pub const SOURCE: &str = "javdb";

const DEFAULT_SITE: &str = "https://javdb.com";
/// Marker text of the empty-results node on the search page.
const EMPTY_RESULT_MARKER: &str = "暫無內容";

const EXPR: ExprSet = ExprSet {
    number: "",
    title: "div.video-detail .current-title",
    studio: "",
    release: "",
    runtime: "",
    director: "",
    actor: "",
    cover: "div.column-video-cover a img@src",
    extra_fanart: "div.preview-images a.tile-item@href",
    tags: "",
    user_rating: "",
    outline: "",
    series: "",
};

pub struct JavDbScraper {
    config: SourceConfig,
    extractor: GenericExtractor,
}

impl JavDbScraper {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            extractor: GenericExtractor::new(EXPR),
        }
    }

    fn base(&self) -> &str {
        self.config.site_or(DEFAULT_SITE)
    }

    /// Label/value lookup with the nested-anchor fallback, applied
    /// independently per field.
    fn labeled(&self, label: &str) -> String {
        self.extractor
            .with_document(|doc| doc.labeled_text("strong", label, "span.value"))
    }
}

#[async_trait]
impl SiteScraper for JavDbScraper {
    async fn fetch(&mut self, code: &str) -> Result<(), ScrapeError> {
        let number = code.to_uppercase();
        self.extractor.set_number(number.clone());

        let mut cookies = Vec::new();
        if !self.config.cookie_file.is_empty() {
            cookies = import_cookies(Path::new(&self.config.cookie_file))?;
        }
        let session = Session::new(SessionSettings {
            cookies,
            proxy: self.config.proxy().map(str::to_string),
            ..SessionSettings::default()
        })?;

        let search_url = format!("{}/search?q={}&f=all", self.base(), number);
        let page = session.get(&search_url).await?;
        let text = page.text();

        let matched = {
            let doc = Document::parse(&text);
            if doc.contains_text(".empty-message", EMPTY_RESULT_MARKER) {
                return Err(ScrapeError::new(
                    FailureKind::NotFound,
                    format!("{number}: javdb reports no content"),
                ));
            }
            // Exact case-insensitive comparison of the displayed code; a
            // substring hit is a different release and must not resolve.
            doc.link_entries(".movie-list .item a[href]", ".video-title strong")
                .into_iter()
                .find(|(_, shown)| shown.eq_ignore_ascii_case(&number))
                .map(|(href, _)| href)
        };
        let Some(href) = matched else {
            return Err(ScrapeError::new(
                FailureKind::NotFound,
                format!("{number}: no exact match in javdb results"),
            ));
        };

        let detail_url = format!("{}{}", self.base(), href);
        info!("javdb resolved {number} to {detail_url}");
        let detail = session.get(&detail_url).await?;
        debug!("javdb detail page: {} bytes", detail.body.len());
        self.extractor.set_page(detail_url, detail.text());
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
        String::new()
    }

    fn director(&self) -> String {
        self.labeled("導演")
    }

    fn release(&self) -> String {
        self.labeled("日期")
    }

    fn runtime(&self) -> String {
        self.labeled("時長")
            .trim_end_matches(['分', '鍾'])
            .trim()
            .to_string()
    }

    fn studio(&self) -> String {
        self.labeled("片商")
    }

    fn series(&self) -> String {
        self.labeled("系列")
    }

    fn tags(&self) -> Vec<String> {
        self.extractor.with_document(|doc| {
            let Some(value) = doc.labeled_element("strong", "類別", "span.value") else {
                return Vec::new();
            };
            anchor_texts(&value)
        })
    }

    fn cover(&self) -> String {
        self.extractor.cover()
    }

    /// The performer block alternates name and gender-marker children; only
    /// names paired with a `female` marker are performers of record here,
    /// which also filters interleaved staff entries.
    fn actors(&self) -> HashMap<String, String> {
        self.extractor.with_document(|doc| {
            let mut actors = HashMap::new();
            let Some(value) = doc.labeled_element("strong", "演員", "span.value") else {
                return actors;
            };
            let mut name = String::new();
            for (index, child) in value.children().filter_map(ElementRef::wrap).enumerate() {
                if index % 2 == 0 {
                    name = full_text(&child);
                    continue;
                }
                if !name.is_empty() && child.value().classes().any(|class| class == "female") {
                    actors.insert(name.clone(), String::new());
                }
            }
            actors
        })
    }
}
