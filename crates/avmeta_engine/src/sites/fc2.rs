//! FC2 adapter: detail page addressed by the numeric article id, tags
//! retrieved independently from a JSON side-channel API.

use std::collections::HashMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use log::{debug, warn};
use regex::Regex;
use serde::Deserialize;

use crate::extract::{ExprSet, GenericExtractor, SiteScraper};
use crate::session::{Session, SessionSettings};
use crate::sites::resolve_link;
use crate::types::{FailureKind, ScrapeError, SourceConfig};

pub const SOURCE: &str = "fc2";

const DEFAULT_SITE: &str = "https://adult.contents.fc2.com";
/// Marketplace listings have no studio or series of their own.
const MARKETPLACE: &str = "FC2";
/// Placeholder performer for listings without a cast block.
const AMATEUR: &str = "素人";

const EXPR: ExprSet = ExprSet {
    number: "",
    title: "head title",
    studio: "",
    release: "#top > div:nth-of-type(1) > section:nth-of-type(1) > div > section \
        > div:nth-of-type(2) > div:nth-of-type(2) > p",
    runtime: "p.items_article_info",
    director: "",
    actor: "#top > div:nth-of-type(1) > section:nth-of-type(1) > div > section \
        > div:nth-of-type(2) > ul > li:nth-of-type(3) > a",
    cover: "div.items_article_MainitemThumb span img@src",
    extra_fanart: "ul.items_article_SampleImagesArea li a@href",
    tags: "a.tag.tagTag",
    user_rating: "",
    outline: "",
    series: "",
};

#[derive(Debug, Deserialize)]
struct TagPayload {
    #[serde(default)]
    tags: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    #[serde(default)]
    tag: String,
}

pub struct Fc2Scraper {
    config: SourceConfig,
    extractor: GenericExtractor,
    tags: Vec<String>,
}

impl Fc2Scraper {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            extractor: GenericExtractor::new(EXPR),
            tags: Vec::new(),
        }
    }

    fn base(&self) -> &str {
        self.config.site_or(DEFAULT_SITE)
    }
}

/// Article ids are the 6-7 digit run inside codes like `FC2-PPV-1234567`.
fn article_id(code: &str) -> Option<&str> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"\d{6,7}").expect("literal pattern compiles"));
    pattern.find(code).map(|found| found.as_str())
}

/// Decodes `{"tags":[{"tag":"..."}]}`, trimming each entry.
fn parse_tags(body: &[u8]) -> Result<Vec<String>, serde_json::Error> {
    let payload: TagPayload = serde_json::from_slice(body)?;
    Ok(payload
        .tags
        .into_iter()
        .map(|entry| entry.tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect())
}

#[async_trait]
impl SiteScraper for Fc2Scraper {
    async fn fetch(&mut self, code: &str) -> Result<(), ScrapeError> {
        let number = code.to_uppercase();
        self.extractor.set_number(number.clone());

        let Some(id) = article_id(code) else {
            return Err(ScrapeError::new(
                FailureKind::NotFound,
                format!("{number}: no numeric article id in code"),
            ));
        };
        let id = id.to_string();

        let session = Session::new(SessionSettings {
            proxy: self.config.proxy().map(str::to_string),
            ..SessionSettings::default()
        })?;

        let detail_url = format!("{}/article/{}/", self.base(), id);
        debug!("fc2 fetching {detail_url}");
        let page = session.get(&detail_url).await?;
        self.extractor.set_page(detail_url, page.text());

        // Tags come from a side channel; losing them must not lose the page.
        let tag_url = format!("{}/api/v4/article/{}/tag?", self.base(), id);
        self.tags = match session.get(&tag_url).await {
            Ok(response) => match parse_tags(&response.body) {
                Ok(tags) => tags,
                Err(err) => {
                    warn!("fc2 tag payload for {number} malformed: {err}");
                    Vec::new()
                }
            },
            Err(err) => {
                warn!("fc2 tag api degraded for {number}: {err}");
                Vec::new()
            }
        };

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
        self.extractor.director()
    }

    /// Raw text reads `販売日 : 2023/01/02`; keep the dashed date.
    fn release(&self) -> String {
        self.extractor
            .release()
            .trim_matches(|c: char| " '[]販売日:".contains(c))
            .replace('/', "-")
    }

    fn runtime(&self) -> String {
        "0".to_string()
    }

    fn studio(&self) -> String {
        MARKETPLACE.to_string()
    }

    fn series(&self) -> String {
        MARKETPLACE.to_string()
    }

    fn tags(&self) -> Vec<String> {
        self.tags.clone()
    }

    fn cover(&self) -> String {
        let src = self.extractor.cover();
        if src.is_empty() {
            return src;
        }
        resolve_link(self.base(), &src).unwrap_or(src)
    }

    /// A missing cast block means an unidentified amateur performer, not a
    /// parse failure.
    fn actors(&self) -> HashMap<String, String> {
        self.extractor.with_document(|doc| {
            let name = doc.find_text(EXPR.actor);
            let name = if name.is_empty() {
                AMATEUR.to_string()
            } else {
                name
            };
            HashMap::from([(name, String::new())])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_id_finds_digit_run() {
        assert_eq!(article_id("fc2-ppv-1234567"), Some("1234567"));
        assert_eq!(article_id("123456"), Some("123456"));
        assert_eq!(article_id("abc"), None);
    }
}
