use std::collections::HashMap;
use std::sync::OnceLock;

use crate::extract::SiteScraper;
use crate::sites::{fc2, javdb, javlibrary, mgstage};
use crate::types::SourceConfig;

/// Constructs one adapter instance for one scrape attempt.
pub type ScraperBuilder = fn(SourceConfig) -> Box<dyn SiteScraper>;

/// Immutable mapping from source identifier to adapter constructor.
///
/// The builtin instance is assembled exactly once, before first lookup, and
/// read-only thereafter. Looking up an unregistered name is a caller error;
/// the orchestrator validates configured source names up front.
pub struct Registry {
    builders: HashMap<&'static str, ScraperBuilder>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Registers a source. Each source registers once, at assembly.
    pub fn register(&mut self, source: &'static str, builder: ScraperBuilder) {
        self.builders.insert(source, builder);
    }

    /// A fresh adapter for `source`, or `None` when unregistered.
    pub fn create(&self, source: &str, config: SourceConfig) -> Option<Box<dyn SiteScraper>> {
        self.builders.get(source).map(|builder| builder(config))
    }

    pub fn contains(&self, source: &str) -> bool {
        self.builders.contains_key(source)
    }

    /// Registered source names, sorted for stable listings.
    pub fn sources(&self) -> Vec<&'static str> {
        let mut sources: Vec<_> = self.builders.keys().copied().collect();
        sources.sort_unstable();
        sources
    }

    /// The process-wide registry holding every builtin adapter.
    pub fn builtin() -> &'static Registry {
        static BUILTIN: OnceLock<Registry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut registry = Registry::new();
            registry.register(fc2::SOURCE, |config| Box::new(fc2::Fc2Scraper::new(config)));
            registry.register(javdb::SOURCE, |config| {
                Box::new(javdb::JavDbScraper::new(config))
            });
            registry.register(javlibrary::SOURCE, |config| {
                Box::new(javlibrary::JavLibraryScraper::new(config))
            });
            registry.register(mgstage::SOURCE, |config| {
                Box::new(mgstage::MgstageScraper::new(config))
            });
            registry
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
