//! Metadata extraction engine: resilient sessioned fetching, declarative
//! field extraction over parsed pages, and per-site scraping adapters behind
//! one contract.
mod assets;
mod cookies;
mod decode;
mod document;
mod extract;
mod registry;
mod session;
pub mod sites;
mod types;

pub use assets::{fetch_binary, verify_on_disk, write_verified, MIN_BINARY_BYTES};
pub use cookies::{import_cookies, Cookie, CookieError};
pub use decode::decode_body;
pub use document::{direct_text, full_text, Document};
pub use extract::{ExprSet, GenericExtractor, SiteScraper};
pub use registry::{Registry, ScraperBuilder};
pub use session::{PageResponse, Session, SessionSettings, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use sites::fc2::Fc2Scraper;
pub use sites::javdb::JavDbScraper;
pub use sites::javlibrary::JavLibraryScraper;
pub use sites::mgstage::MgstageScraper;
pub use types::{FailureKind, MetadataRecord, ScrapeError, SourceConfig};
