//! Wire tests for the DuckDuckGo backend.

mod common;

use common::{config_for, setup_mock_server};
use imgdeck::engines::duckduckgo::DuckDuckGo;
use imgdeck::{Error, SearchEngine};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn front_page_with_token(token: &str) -> String {
    format!("<html><script>navigate(\"/?q=x&vqd={token}&kl=wt-wt\");</script></html>")
}

fn result_page(items: serde_json::Value, next: Option<&str>) -> serde_json::Value {
    let mut page = serde_json::json!({ "results": items });
    if let Some(next) = next {
        page["next"] = serde_json::Value::String(next.to_string());
    }
    page
}

#[tokio::test]
async fn single_page_search_returns_matches() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "red panda"))
        .respond_with(ResponseTemplate::new(200).set_body_string(front_page_with_token("3-123")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/i.js"))
        .and(query_param("vqd", "3-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_page(
            serde_json::json!([
                {"title": "A red panda", "image": "https://img.example/1.jpg", "width": 640, "height": 480},
                {"title": "Another", "image": "https://img.example/2.jpg", "width": 100, "height": 200}
            ]),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let engine = DuckDuckGo::new(&config_for(&server));
    let matches = engine.search("red panda").await.unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].title.as_deref(), Some("A red panda"));
    assert_eq!(matches[0].url, "https://img.example/1.jpg");
    assert_eq!(matches[0].width, Some(640));
    assert_eq!(matches[0].height, Some(480));
    assert!(!matches[0].selected);
    assert!(matches[0].file().is_none());
}

#[tokio::test]
async fn pagination_follows_next_link() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(front_page_with_token("3-9")))
        .mount(&server)
        .await;

    // First page carries a continuation link back into i.js.
    Mock::given(method("GET"))
        .and(path("/i.js"))
        .and(query_param("s", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_page(
            serde_json::json!([
                {"title": "three", "image": "https://img.example/3.jpg", "width": 3, "height": 3}
            ]),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/i.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_page(
            serde_json::json!([
                {"title": "one", "image": "https://img.example/1.jpg", "width": 1, "height": 1},
                {"title": "two", "image": "https://img.example/2.jpg", "width": 2, "height": 2}
            ]),
            Some("i.js?s=100"),
        )))
        .mount(&server)
        .await;

    let engine = DuckDuckGo::new(&config_for(&server));
    let matches = engine.search("red panda").await.unwrap();

    assert_eq!(matches.len(), 3);
    assert_eq!(matches[2].url, "https://img.example/3.jpg");
}

#[tokio::test]
async fn maxn_modifier_caps_results_and_is_stripped() {
    let server = setup_mock_server().await;

    // Both phases must see the query without the maxn token.
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "red panda"))
        .respond_with(ResponseTemplate::new(200).set_body_string(front_page_with_token("3-5")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/i.js"))
        .and(query_param("q", "red panda"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_page(
            serde_json::json!([
                {"title": "one", "image": "https://img.example/1.jpg", "width": 1, "height": 1},
                {"title": "two", "image": "https://img.example/2.jpg", "width": 2, "height": 2}
            ]),
            Some("i.js?s=100"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let engine = DuckDuckGo::new(&config_for(&server));
    let matches = engine.search("red maxn:1 panda").await.unwrap();

    // Capped before the continuation link is ever followed.
    assert_eq!(matches.len(), 1);
}

#[tokio::test]
async fn missing_token_is_a_backend_malfunction() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nothing here</html>"))
        .mount(&server)
        .await;

    let engine = DuckDuckGo::new(&config_for(&server));
    let err = engine.search("red panda").await.unwrap_err();
    assert!(matches!(err, Error::Backend(_)));
}

#[tokio::test]
async fn undecodable_result_page_is_a_backend_malfunction() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(front_page_with_token("3-1")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/i.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string("if (window) { throw }"))
        .expect(3)
        .mount(&server)
        .await;

    let engine = DuckDuckGo::new(&config_for(&server));
    let err = engine.search("red panda").await.unwrap_err();
    assert!(matches!(err, Error::Backend(_)));
}

#[tokio::test]
async fn zero_results_is_not_an_error() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(front_page_with_token("3-0")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/i.js"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(result_page(serde_json::json!([]), None)),
        )
        .mount(&server)
        .await;

    let engine = DuckDuckGo::new(&config_for(&server));
    let matches = engine.search("zxqjv").await.unwrap();
    assert!(matches.is_empty());
}
