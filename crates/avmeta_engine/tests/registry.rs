use avmeta_engine::{JavDbScraper, Registry, SiteScraper, SourceConfig};

#[test]
fn builtin_knows_every_shipping_source() {
    let registry = Registry::builtin();
    assert_eq!(
        registry.sources(),
        vec!["fc2", "javdb", "javlibrary", "mgstage"]
    );
    for source in registry.sources() {
        assert!(registry.create(source, SourceConfig::default()).is_some());
    }
}

#[test]
fn unknown_source_yields_nothing() {
    let registry = Registry::builtin();
    assert!(!registry.contains("unheard-of"));
    assert!(registry
        .create("unheard-of", SourceConfig::default())
        .is_none());
}

#[test]
fn fresh_adapters_answer_empty_values_before_any_fetch() {
    let registry = Registry::builtin();
    for source in registry.sources() {
        let scraper = registry
            .create(source, SourceConfig::default())
            .expect("builtin source");
        assert_eq!(scraper.uri(), "", "{source}");
        assert_eq!(scraper.number(), "", "{source}");
        assert_eq!(scraper.title(), "", "{source}");
        assert!(scraper.actors().is_empty(), "{source}");
    }
}

#[test]
fn callers_can_register_their_own_sources() {
    let mut registry = Registry::new();
    registry.register("mirror", |config| Box::new(JavDbScraper::new(config)));

    assert!(registry.contains("mirror"));
    assert_eq!(registry.sources(), vec!["mirror"]);
    assert!(registry.create("mirror", SourceConfig::default()).is_some());
}
