//! JavLibrary adapter: keyword search that either redirects straight to the
//! detail page (single hit) or answers a result list to scan.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, info};

use crate::cookies::Cookie;
use crate::document::Document;
use crate::extract::{ExprSet, GenericExtractor, SiteScraper};
use crate::session::{Session, SessionSettings};
use crate::sites::resolve_link;
use crate::types::{FailureKind, ScrapeError, SourceConfig};

pub const SOURCE: &str = "javlibrary";

const DEFAULT_SITE: &str = "http://www.javlibrary.com/cn";
/// A search that auto-collapses to one hit redirects to `/?v=jav...`.
const SINGLE_RESULT_MARKER: &str = "/?v=jav";

const EXPR: ExprSet = ExprSet {
    number: "div#video_id table tr td.text",
    title: "div#video_title h3 a",
    studio: "div#video_maker table tr td.text span a",
    release: "div#video_date table tr td.text",
    runtime: "div#video_length table tr td span.text",
    director: "div#video_director table tr td.text span a",
    actor: "div#video_cast table tr td.text span span.star a",
    cover: "img#video_jacket_img@src",
    extra_fanart: "div.previewthumbs img@src",
    tags: "div#video_genres table tr td.text span a",
    user_rating: "div#video_review table tr td span.score",
    outline: "",
    series: "",
};

pub struct JavLibraryScraper {
    config: SourceConfig,
    extractor: GenericExtractor,
}

impl JavLibraryScraper {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            extractor: GenericExtractor::new(EXPR),
        }
    }

    fn base(&self) -> &str {
        self.config.site_or(DEFAULT_SITE)
    }
}

#[async_trait]
impl SiteScraper for JavLibraryScraper {
    async fn fetch(&mut self, code: &str) -> Result<(), ScrapeError> {
        let number = code.to_uppercase();
        self.extractor.set_number(number.clone());

        let session = Session::new(SessionSettings {
            cookies: vec![Cookie::pair("over18", "1")],
            proxy: self.config.proxy().map(str::to_string),
            ..SessionSettings::default()
        })?;

        let search_url = format!("{}/vl_searchbyid.php?keyword={}", self.base(), number);
        let page = session.get(&search_url).await?;

        if page.final_url.contains(SINGLE_RESULT_MARKER) {
            info!("javlibrary search for {number} collapsed to {}", page.final_url);
            let uri = page.final_url.clone();
            self.extractor.set_page(uri, page.text());
            return Ok(());
        }

        let text = page.text();
        let matched = {
            let doc = Document::parse(&text);
            doc.link_entries("div.video a[href]", "div.id")
                .into_iter()
                .find(|(_, shown)| shown.eq_ignore_ascii_case(&number))
                .map(|(href, _)| href)
        };
        let Some(href) = matched else {
            return Err(ScrapeError::new(
                FailureKind::NotFound,
                format!("{number}: no exact match in javlibrary results"),
            ));
        };

        let detail_url = resolve_link(&page.final_url, &href)?;
        debug!("javlibrary resolved {number} to {detail_url}");
        let detail = session.get(&detail_url).await?;
        let uri = detail.final_url.clone();
        self.extractor.set_page(uri, detail.text());
        Ok(())
    }

    fn uri(&self) -> String {
        self.extractor.uri()
    }

    fn number(&self) -> String {
        self.extractor.number()
    }

    /// Raw titles lead with the code; strip it.
    fn title(&self) -> String {
        self.extractor
            .title()
            .replace(&self.number(), "")
            .trim()
            .to_string()
    }

    // The synopsis lives behind a members-only page on this source.
    fn outline(&self) -> String {
        String::new()
    }

    fn director(&self) -> String {
        self.extractor.director()
    }

    fn release(&self) -> String {
        self.extractor.release()
    }

    fn runtime(&self) -> String {
        self.extractor.runtime()
    }

    fn studio(&self) -> String {
        self.extractor.studio()
    }

    fn series(&self) -> String {
        self.extractor.series()
    }

    fn tags(&self) -> Vec<String> {
        self.extractor.tags()
    }

    /// Jacket images are served scheme-relative.
    fn cover(&self) -> String {
        let uri = self.extractor.cover();
        if uri.is_empty() || uri.starts_with("http") {
            uri
        } else {
            format!("https:{uri}")
        }
    }

    fn actors(&self) -> HashMap<String, String> {
        self.extractor.actors()
    }
}
