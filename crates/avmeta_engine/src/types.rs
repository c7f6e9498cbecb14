use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classifies how a fetch or asset download failed.
///
/// Getters never produce these; only `fetch` and the binary-asset path can.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// No search or resolution entry matched the requested code.
    NotFound,
    /// A required request answered with a status of 400 or above.
    HttpStatus(u16),
    Timeout,
    /// Transport failure after the retry budget was spent.
    Network,
    InvalidUrl,
    /// Malformed page or side-channel payload.
    ParseFailure,
    /// Downloaded asset smaller than the anti-placeholder minimum.
    Incomplete,
    /// On-disk size did not match the downloaded length, or the write itself
    /// failed; any partial file has been removed.
    WriteFailed,
    /// Cookie import file unreadable or not valid exported-session JSON.
    CookieFile,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::ParseFailure => write!(f, "parse failure"),
            FailureKind::Incomplete => write!(f, "incomplete asset"),
            FailureKind::WriteFailed => write!(f, "write failed"),
            FailureKind::CookieFile => write!(f, "cookie file error"),
        }
    }
}

/// Error surfaced by `SiteScraper::fetch` and the asset downloader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ScrapeError {
    pub kind: FailureKind,
    pub message: String,
}

impl ScrapeError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// True when another source may still have the item.
    pub fn is_not_found(&self) -> bool {
        self.kind == FailureKind::NotFound
    }
}

/// Per-source scrape configuration, immutable for one attempt.
///
/// Supplied by the external configuration layer; `site` overrides the
/// adapter's canonical base URL when non-empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub disable: bool,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub use_proxy: bool,
    #[serde(default)]
    pub proxy: String,
    #[serde(default)]
    pub cookie_file: String,
}

impl SourceConfig {
    /// Proxy address, honored only when the proxy toggle is set.
    pub fn proxy(&self) -> Option<&str> {
        if self.use_proxy && !self.proxy.is_empty() {
            Some(&self.proxy)
        } else {
            None
        }
    }

    /// The configured base URL, or `default` when unset; trailing slash
    /// trimmed so paths can be appended verbatim.
    pub fn site_or<'a>(&'a self, default: &'a str) -> &'a str {
        let site = if self.site.is_empty() {
            default
        } else {
            &self.site
        };
        site.trim_end_matches('/')
    }
}

/// One extracted record, handed to the external library writer.
///
/// Actor notes are reserved for alias resolution done downstream; the engine
/// always leaves them empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub uri: String,
    pub number: String,
    pub title: String,
    pub outline: String,
    pub director: String,
    pub release: String,
    pub runtime: String,
    pub studio: String,
    pub series: String,
    pub tags: Vec<String>,
    pub cover: String,
    pub actors: HashMap<String, String>,
}
