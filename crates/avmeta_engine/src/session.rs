use std::time::Duration;

use log::{debug, warn};
use reqwest::header;

use crate::cookies::{self, Cookie};
use crate::decode;
use crate::types::{FailureKind, ScrapeError};

/// Fixed desktop user agent; some sources fingerprint anything unusual.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/105.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Transport-failure retry budget for one GET. Retries never cross lookup
/// phases; HTTP error statuses are not retried at all.
const RETRY_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub user_agent: String,
    pub timeout: Duration,
    pub proxy: Option<String>,
    /// Several sources run misconfigured TLS; certificate validation is
    /// relaxed by default.
    pub accept_invalid_certs: bool,
    pub cookies: Vec<Cookie>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            accept_invalid_certs: true,
            cookies: Vec::new(),
        }
    }
}

/// One fetched page: final URL after redirects, status, raw body.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl PageResponse {
    /// Body decoded to UTF-8 via the charset layer.
    pub fn text(&self) -> String {
        decode::decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Configured HTTP client scoped to one adapter fetch.
///
/// Injected cookies are sent on every request of the session regardless of
/// request URI, mirroring the permissive behavior the gated sources expect.
#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
    cookie_header: Option<String>,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Result<Self, ScrapeError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(settings.user_agent)
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs);

        if let Some(proxy) = settings.proxy.as_deref() {
            let proxy = reqwest::Proxy::all(proxy).map_err(|err| {
                ScrapeError::new(FailureKind::InvalidUrl, format!("proxy {proxy}: {err}"))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|err| ScrapeError::new(FailureKind::Network, err.to_string()))?;

        let cookie_header = if settings.cookies.is_empty() {
            None
        } else {
            Some(cookies::header_value(&settings.cookies))
        };

        Ok(Self {
            client,
            cookie_header,
        })
    }

    /// GET with up to three attempts on transport failure.
    ///
    /// Each attempt is issued fresh; a failed attempt's partial response is
    /// dropped before reissuing. A status of 400 or above is a failed fetch
    /// and returns immediately without retrying.
    pub async fn get(&self, url: &str) -> Result<PageResponse, ScrapeError> {
        reqwest::Url::parse(url)
            .map_err(|err| ScrapeError::new(FailureKind::InvalidUrl, format!("{url}: {err}")))?;

        let mut last_err = None;
        for attempt in 1..=RETRY_ATTEMPTS {
            match self.try_get(url).await {
                Ok(page) => {
                    if page.status >= 400 {
                        return Err(ScrapeError::new(
                            FailureKind::HttpStatus(page.status),
                            format!("{url} answered {}", page.status),
                        ));
                    }
                    debug!("GET {url} -> {} ({} bytes)", page.status, page.body.len());
                    return Ok(page);
                }
                Err(err) => {
                    warn!("GET {url} attempt {attempt}/{RETRY_ATTEMPTS} failed: {err}");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| ScrapeError::new(FailureKind::Network, "retry budget exhausted")))
    }

    async fn try_get(&self, url: &str) -> Result<PageResponse, ScrapeError> {
        let mut request = self.client.get(url).header(header::REFERER, url);
        if let Some(cookie) = &self.cookie_header {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = response
            .bytes()
            .await
            .map_err(map_transport_error)?
            .to_vec();

        Ok(PageResponse {
            final_url,
            status,
            content_type,
            body,
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> ScrapeError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Network
    };
    ScrapeError::new(kind, err.to_string())
}
