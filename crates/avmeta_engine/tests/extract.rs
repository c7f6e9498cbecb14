use avmeta_engine::{Document, ExprSet, GenericExtractor, MetadataRecord, SiteScraper};
use pretty_assertions::assert_eq;

const LABEL_PAGE: &str = r#"
<div class="panel-block"><strong>日期:</strong> <span class="value">2023-04-01</span></div>
<div class="panel-block"><strong>導演:</strong> <span class="value"><a href="/d/1">Some Director</a></span></div>
<div class="panel-block"><strong>片商:</strong></div>
"#;

#[test]
fn attr_suffix_reads_the_attribute_instead_of_text() {
    let doc = Document::parse(r#"<img id="jacket" src=" //pics.example/x.jpg "> "#);
    assert_eq!(doc.find_text("img#jacket@src"), "//pics.example/x.jpg");
    assert_eq!(doc.find_text("img#jacket"), "");
}

#[test]
fn unmatched_queries_yield_empty_values() {
    let doc = Document::parse("<p>hello</p>");
    assert_eq!(doc.find_text("div.absent"), "");
    assert!(doc.find_all_text("div.absent").is_empty());
    assert_eq!(doc.find_attr("p", "missing"), "");
    assert!(!doc.contains_text("p", "absent"));
}

#[test]
fn labeled_text_prefers_direct_text_then_nested_anchor() {
    let doc = Document::parse(LABEL_PAGE);
    assert_eq!(doc.labeled_text("strong", "日期", "span.value"), "2023-04-01");
    assert_eq!(
        doc.labeled_text("strong", "導演", "span.value"),
        "Some Director"
    );
    // A label with no matching value sibling resolves to nothing.
    assert_eq!(doc.labeled_text("strong", "片商", "span.value"), "");
}

#[test]
fn labeled_element_walks_past_intervening_siblings() {
    let doc = Document::parse(
        r#"<strong>収録時間:</strong> <em>note</em><span class="value">90min</span>"#,
    );
    let cell = doc
        .labeled_element("strong", "収録時間", "span.value")
        .expect("value element");
    assert_eq!(avmeta_engine::full_text(&cell), "90min");
}

#[test]
fn link_entries_pair_hrefs_with_displayed_codes() {
    let doc = Document::parse(
        r#"
        <div class="video"><a href="./?v=javme1"><div class="id">ABC-123</div></a></div>
        <div class="video"><a><div class="id">NO-HREF</div></a></div>
        <div class="video"><a href="./?v=javme2"><div class="notid">skipped</div></a></div>
        <div class="video"><a href="./?v=javme3"><div class="id">DEF-456</div></a></div>
        "#,
    );
    let entries = doc.link_entries("div.video a", "div.id");
    assert_eq!(
        entries,
        vec![
            ("./?v=javme1".to_string(), "ABC-123".to_string()),
            ("./?v=javme3".to_string(), "DEF-456".to_string()),
        ]
    );
}

#[test]
fn unfetched_extractor_yields_empty_values_from_every_getter() {
    let extractor = GenericExtractor::new(ExprSet {
        title: "h1",
        actor: "a.star",
        ..ExprSet::default()
    });

    assert_eq!(extractor.uri(), "");
    assert_eq!(extractor.number(), "");
    assert_eq!(extractor.title(), "");
    assert!(extractor.tags().is_empty());
    assert!(extractor.actors().is_empty());
}

#[test]
fn record_collects_every_field_from_the_held_page() {
    let mut extractor = GenericExtractor::new(ExprSet {
        title: "h1",
        studio: "span.maker",
        tags: "a.genre",
        actor: "a.star",
        cover: "img.jacket@src",
        ..ExprSet::default()
    });
    extractor.set_number("ABC-123");
    extractor.set_page(
        "https://example.com/v/1",
        r#"
        <h1>A Title</h1>
        <span class="maker">Studio X</span>
        <a class="genre">Drama</a><a class="genre">Romance</a>
        <a class="star">Actor A</a><a class="star"></a>
        <img class="jacket" src="/covers/1.jpg">
        "#
        .to_string(),
    );

    let record = MetadataRecord::from_scraper(&extractor);
    assert_eq!(record.uri, "https://example.com/v/1");
    assert_eq!(record.number, "ABC-123");
    assert_eq!(record.title, "A Title");
    assert_eq!(record.studio, "Studio X");
    assert_eq!(record.tags, vec!["Drama".to_string(), "Romance".to_string()]);
    assert_eq!(record.cover, "/covers/1.jpg");
    // Empty performer names are dropped, never inserted as blank keys.
    assert_eq!(record.actors.len(), 1);
    assert_eq!(record.actors.get("Actor A"), Some(&String::new()));
}
