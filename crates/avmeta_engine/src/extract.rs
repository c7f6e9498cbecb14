use std::collections::HashMap;

use async_trait::async_trait;

use crate::document::Document;
use crate::types::{MetadataRecord, ScrapeError};

/// Declarative field-to-query mapping for one source, built once and
/// constant thereafter. Empty expressions match nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprSet {
    pub number: &'static str,
    pub title: &'static str,
    pub studio: &'static str,
    pub release: &'static str,
    pub runtime: &'static str,
    pub director: &'static str,
    pub actor: &'static str,
    pub cover: &'static str,
    pub extra_fanart: &'static str,
    pub tags: &'static str,
    pub user_rating: &'static str,
    pub outline: &'static str,
    pub series: &'static str,
}

/// The scraper contract consumed by the orchestrator.
///
/// `fetch` runs a source's lookup protocol once per instance; every getter
/// is total afterwards (and before — an unfetched scraper yields empty
/// values). Instances are fetch-once/read-many and must not have `fetch`
/// invoked concurrently.
#[async_trait]
pub trait SiteScraper: Send {
    async fn fetch(&mut self, code: &str) -> Result<(), ScrapeError>;

    /// Resolved detail-page address.
    fn uri(&self) -> String;
    /// Canonical (uppercased, source-corrected) code.
    fn number(&self) -> String;

    fn title(&self) -> String;
    fn outline(&self) -> String;
    fn director(&self) -> String;
    fn release(&self) -> String;
    fn runtime(&self) -> String;
    fn studio(&self) -> String;
    fn series(&self) -> String;
    fn tags(&self) -> Vec<String>;
    fn cover(&self) -> String;
    /// Performer name to note; notes stay empty here and are reserved for
    /// downstream alias resolution.
    fn actors(&self) -> HashMap<String, String>;
}

/// Expression-driven implementation of the getter set.
///
/// Concrete adapters own the lookup protocol: they fetch, then assign the
/// page into this extractor and delegate the getters they do not override.
/// Its own `fetch` is deliberately inert.
#[derive(Debug, Clone, Default)]
pub struct GenericExtractor {
    expr: ExprSet,
    uri: String,
    number: String,
    page: Option<String>,
}

impl GenericExtractor {
    pub fn new(expr: ExprSet) -> Self {
        Self {
            expr,
            ..Self::default()
        }
    }

    /// Canonical number chosen by the adapter, usually the uppercased code.
    pub fn set_number(&mut self, number: impl Into<String>) {
        self.number = number.into();
    }

    /// Replaces the held page wholesale with a freshly fetched one.
    pub fn set_page(&mut self, uri: impl Into<String>, page: String) {
        self.uri = uri.into();
        self.page = Some(page);
    }

    /// Runs a query against the held page; `T::default()` when unfetched.
    pub fn with_document<T: Default>(&self, query: impl FnOnce(&Document) -> T) -> T {
        match &self.page {
            Some(page) => query(&Document::parse(page)),
            None => T::default(),
        }
    }

    pub fn find(&self, expr: &str) -> String {
        self.with_document(|doc| doc.find_text(expr))
    }

    pub fn find_all(&self, expr: &str) -> Vec<String> {
        self.with_document(|doc| doc.find_all_text(expr))
    }
}

#[async_trait]
impl SiteScraper for GenericExtractor {
    async fn fetch(&mut self, _code: &str) -> Result<(), ScrapeError> {
        Ok(())
    }

    fn uri(&self) -> String {
        self.uri.clone()
    }

    fn number(&self) -> String {
        self.number.clone()
    }

    fn title(&self) -> String {
        self.find(self.expr.title)
    }

    fn outline(&self) -> String {
        self.find(self.expr.outline)
    }

    fn director(&self) -> String {
        self.find(self.expr.director)
    }

    fn release(&self) -> String {
        self.find(self.expr.release)
    }

    fn runtime(&self) -> String {
        self.find(self.expr.runtime)
    }

    fn studio(&self) -> String {
        self.find(self.expr.studio)
    }

    fn series(&self) -> String {
        self.find(self.expr.series)
    }

    fn tags(&self) -> Vec<String> {
        self.find_all(self.expr.tags)
    }

    fn cover(&self) -> String {
        self.find(self.expr.cover)
    }

    fn actors(&self) -> HashMap<String, String> {
        self.find_all(self.expr.actor)
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(|name| (name, String::new()))
            .collect()
    }
}

impl MetadataRecord {
    /// Drains the getter set of a fetched scraper into one output record.
    pub fn from_scraper(scraper: &dyn SiteScraper) -> Self {
        Self {
            uri: scraper.uri(),
            number: scraper.number(),
            title: scraper.title(),
            outline: scraper.outline(),
            director: scraper.director(),
            release: scraper.release(),
            runtime: scraper.runtime(),
            studio: scraper.studio(),
            series: scraper.series(),
            tags: scraper.tags(),
            cover: scraper.cover(),
            actors: scraper.actors(),
        }
    }
}
