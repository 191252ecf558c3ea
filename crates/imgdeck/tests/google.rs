//! Wire tests for the Google backend.

mod common;

use common::{config_for, setup_mock_server};
use imgdeck::SearchEngine;
use imgdeck::engines::google::Google;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

const RESULTS_BODY: &str = concat!(
    "<html><script>AF_initDataCallback({key: 'ds:1', data:[",
    r#"["https://encrypted-tbn0.gstatic.com/images?q=tbn:1", 180, 240],"#,
    r#"["https://commons.example/red_panda.jpg", 480, 640],"#,
    r#"["https://pages.example/red_panda", "Red panda resting", null],"#,
    r#"["https://zoo.example/ailurus.png", 900, 1200]"#,
    "]});</script></html>"
);

#[tokio::test]
async fn scrape_produces_titled_matches() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "red panda"))
        .and(query_param("tbm", "isch"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let engine = Google::new(&config_for(&server));
    let matches = engine.search("red panda").await.unwrap();

    // The gstatic thumbnail row is dropped.
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].url, "https://commons.example/red_panda.jpg");
    assert_eq!(matches[0].title.as_deref(), Some("Red panda resting"));
    assert_eq!(matches[0].width, Some(640));
    assert_eq!(matches[0].height, Some(480));
    assert_eq!(matches[1].url, "https://zoo.example/ailurus.png");
    assert!(matches[1].title.is_none());
}

#[tokio::test]
async fn maxn_modifier_caps_and_is_stripped_from_query() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "red panda"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let engine = Google::new(&config_for(&server));
    let matches = engine.search("red panda maxn:1").await.unwrap();
    assert_eq!(matches.len(), 1);
}

#[tokio::test]
async fn page_without_payload_yields_zero_matches() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>No images</body></html>"))
        .mount(&server)
        .await;

    let engine = Google::new(&config_for(&server));
    let matches = engine.search("zxqjv").await.unwrap();
    assert!(matches.is_empty());
}
