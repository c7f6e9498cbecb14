use avmeta_engine::{Fc2Scraper, SiteScraper, SourceConfig};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DETAIL_PAGE: &str = r#"<html><head><title>Homemade Clip</title></head><body>
<div id="top"><div><section><div><section>
<div class="items_article_header"></div>
<div>
<div class="items_article_Releasedate"></div>
<div><p>販売日 : 2023/01/02</p></div>
<ul><li>misc</li><li>misc</li><li><a href="/users/seller">Seller Name</a></li></ul>
</div>
</section></div></section></div></div>
<div class="items_article_MainitemThumb"><span><img src="/storage/cover.jpg"></span></div>
</body></html>"#;

const TAG_PAYLOAD: &str = r#"{"tags": [{"tag": " Anal "}, {"tag": "Solo"}, {"tag": "  "}]}"#;

fn config(server: &MockServer) -> SourceConfig {
    SourceConfig {
        site: server.uri(),
        ..SourceConfig::default()
    }
}

async fn mount_detail(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/article/1234567/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            body.to_string(),
            "text/html; charset=utf-8",
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn article_page_and_tag_api_are_combined() {
    engine_logging::init_for_tests();
    let server = MockServer::start().await;
    mount_detail(&server, DETAIL_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/api/v4/article/1234567/tag"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(TAG_PAYLOAD, "application/json"),
        )
        .mount(&server)
        .await;

    let mut scraper = Fc2Scraper::new(config(&server));
    scraper.fetch("fc2-ppv-1234567").await.expect("fetch");

    assert_eq!(scraper.uri(), format!("{}/article/1234567/", server.uri()));
    assert_eq!(scraper.number(), "FC2-PPV-1234567");
    assert_eq!(scraper.title(), "Homemade Clip");
    assert_eq!(scraper.release(), "2023-01-02");
    assert_eq!(scraper.runtime(), "0");
    assert_eq!(scraper.studio(), "FC2");
    assert_eq!(scraper.series(), "FC2");
    assert_eq!(scraper.tags(), vec!["Anal".to_string(), "Solo".to_string()]);
    assert_eq!(scraper.cover(), format!("{}/storage/cover.jpg", server.uri()));

    let actors = scraper.actors();
    assert_eq!(actors.len(), 1);
    assert!(actors.contains_key("Seller Name"));
}

#[tokio::test]
async fn failed_tag_api_degrades_to_no_tags() {
    let server = MockServer::start().await;
    mount_detail(&server, DETAIL_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/api/v4/article/1234567/tag"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut scraper = Fc2Scraper::new(config(&server));
    scraper.fetch("FC2-PPV-1234567").await.expect("fetch");

    assert!(scraper.tags().is_empty());
    assert_eq!(scraper.title(), "Homemade Clip");
}

#[tokio::test]
async fn malformed_tag_payload_degrades_to_no_tags() {
    let server = MockServer::start().await;
    mount_detail(&server, DETAIL_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/api/v4/article/1234567/tag"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let mut scraper = Fc2Scraper::new(config(&server));
    scraper.fetch("FC2-PPV-1234567").await.expect("fetch");

    assert!(scraper.tags().is_empty());
}

#[tokio::test]
async fn listing_without_a_cast_block_gets_the_amateur_placeholder() {
    let server = MockServer::start().await;
    mount_detail(
        &server,
        r#"<html><head><title>Clip</title></head><body></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/article/1234567/tag"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"tags": []}"#))
        .mount(&server)
        .await;

    let mut scraper = Fc2Scraper::new(config(&server));
    scraper.fetch("FC2-PPV-1234567").await.expect("fetch");

    let actors = scraper.actors();
    assert_eq!(actors.len(), 1);
    assert!(actors.contains_key("素人"));
}

#[tokio::test]
async fn code_without_an_article_id_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut scraper = Fc2Scraper::new(config(&server));
    let err = scraper.fetch("no-digits-here").await.unwrap_err();
    assert!(err.is_not_found());
}
