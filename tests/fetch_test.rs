//! Tests for the document-retrieval collaborator behind `from_url`.

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use docpluck::{Field, Model, Resolver, Value};

const FEED: &str = "<channel><title>Revolutions</title></channel>";

fn title_model() -> Model {
    Model::builder()
        .field("title", Field::new(["channel/title/text()"]))
        .build()
        .expect("valid model")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_from_url_downloads_and_parses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .mount(&server)
        .await;

    let url = format!("{}/feed.xml", server.uri());
    let resolver = tokio::task::spawn_blocking(move || Resolver::from_url(&url, "xml", None))
        .await
        .expect("join")
        .expect("fetch and parse");

    let record = resolver.parse(&title_model()).expect("resolve");
    assert_eq!(
        record.get("title"),
        Some(&Value::Str("Revolutions".to_string()))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_from_url_retries_transient_server_error() {
    let server = MockServer::start().await;
    // First attempt fails with a 500, the retry succeeds.
    Mock::given(method("GET"))
        .and(path("/flaky.xml"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .mount(&server)
        .await;

    let url = format!("{}/flaky.xml", server.uri());
    let resolver = tokio::task::spawn_blocking(move || Resolver::from_url(&url, "xml", None))
        .await
        .expect("join")
        .expect("fetch after retry");

    let record = resolver.parse(&title_model()).expect("resolve");
    assert_eq!(
        record.get("title"),
        Some(&Value::Str("Revolutions".to_string()))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_from_url_decodes_invalid_utf8_lossily() {
    let server = MockServer::start().await;
    // e-acute as a lone Latin-1 byte, not valid UTF-8.
    let body: &[u8] = b"<channel><title>Caf\xe9</title></channel>";
    Mock::given(method("GET"))
        .and(path("/latin1.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(&server)
        .await;

    let url = format!("{}/latin1.xml", server.uri());
    let resolver = tokio::task::spawn_blocking(move || Resolver::from_url(&url, "xml", None))
        .await
        .expect("join")
        .expect("fetch and parse");

    let record = resolver.parse(&title_model()).expect("resolve");
    assert_eq!(
        record.get("title"),
        Some(&Value::Str("Caf\u{fffd}".to_string()))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_from_url_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.xml"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/missing.xml", server.uri());
    let result = tokio::task::spawn_blocking(move || Resolver::from_url(&url, "xml", None))
        .await
        .expect("join");

    assert!(result.is_err());
}
