use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use thiserror::Error;

use crate::types::{FailureKind, ScrapeError};

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("cookie file {path} unreadable: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },
    #[error("cookie file {path} is not valid exported-session JSON: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
}

impl From<CookieError> for ScrapeError {
    fn from(err: CookieError) -> Self {
        ScrapeError::new(FailureKind::CookieFile, err.to_string())
    }
}

/// One cookie injected into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    /// `None` for session cookies, which pass through unexpired.
    pub expires: Option<SystemTime>,
}

impl Cookie {
    /// A bare name/value cookie, used for fixed gate cookies like `over18=1`.
    pub fn pair(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: String::new(),
            secure: false,
            http_only: false,
            expires: None,
        }
    }
}

/// Shape of one entry in a browser-exported session JSON array.
#[derive(Debug, Deserialize)]
struct ExportedCookie {
    #[serde(default)]
    domain: String,
    #[serde(default, rename = "expirationDate")]
    expiration_date: Option<f64>,
    #[serde(default, rename = "httpOnly")]
    http_only: bool,
    name: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    secure: bool,
    #[serde(default)]
    value: String,
}

/// Parses a browser cookie export into session cookies.
///
/// The float `expirationDate` is split into whole seconds plus the
/// fractional remainder as nanoseconds; entries without one are session
/// cookies. Domain, path, secure and httpOnly copy through verbatim.
pub fn import_cookies(path: &Path) -> Result<Vec<Cookie>, CookieError> {
    let data = fs::read(path).map_err(|source| CookieError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    let exported: Vec<ExportedCookie> =
        serde_json::from_slice(&data).map_err(|source| CookieError::Malformed {
            path: path.display().to_string(),
            source,
        })?;

    Ok(exported.into_iter().map(from_exported).collect())
}

fn from_exported(entry: ExportedCookie) -> Cookie {
    let expires = entry.expiration_date.map(|stamp| {
        let secs = stamp.trunc() as u64;
        let nanos = (stamp.fract() * 1e9) as u32;
        UNIX_EPOCH + Duration::new(secs, nanos)
    });

    Cookie {
        name: entry.name,
        value: entry.value,
        domain: entry.domain,
        path: entry.path,
        secure: entry.secure,
        http_only: entry.http_only,
        expires,
    }
}

/// Joins cookies into a single request `Cookie` header value.
///
/// Scope matching is deliberately not enforced; the sources gate on cookie
/// presence and the sessions are short-lived per fetch.
pub(crate) fn header_value(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|cookie| format!("{}={}", cookie.name, cookie.value))
        .collect::<Vec<_>>()
        .join("; ")
}
