#![allow(clippy::unwrap_used)]
// Integration tests for the HTTP handles using wiremock.

use secrecy::SecretString;
use url::Url;
use wiremock::matchers::{body_string, header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use habconn_api::{AsyncHttpClient, BasicCredentials, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn base_url(server: &MockServer) -> Url {
    habconn_api::normalize_url(&server.uri()).unwrap()
}

fn credentials() -> BasicCredentials {
    let password = SecretString::from("Test-Password".to_owned());
    BasicCredentials::from_parts(Some("Test-User"), Some(&password)).unwrap()
}

// ── Requests ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_sends_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/items"))
        .and(header(
            "authorization",
            "Basic VGVzdC1Vc2VyOlRlc3QtUGFzc3dvcmQ=",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let creds = credentials();
    let client =
        AsyncHttpClient::new(base_url(&server), Some(&creds), &TransportConfig::default()).unwrap();

    let body = client.get("/rest/items").await.unwrap();
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_get_without_credentials_sends_no_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/sitemaps"))
        .respond_with(|req: &Request| {
            if req.headers.contains_key("authorization") {
                ResponseTemplate::new(400)
            } else {
                ResponseTemplate::new(200).set_body_string("ok")
            }
        })
        .mount(&server)
        .await;

    let client = AsyncHttpClient::new(base_url(&server), None, &TransportConfig::default()).unwrap();
    assert_eq!(client.get("rest/sitemaps").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/items/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = AsyncHttpClient::new(base_url(&server), None, &TransportConfig::default()).unwrap();
    let err = client.get("rest/items/Missing").await.unwrap_err();

    assert!(
        matches!(err, Error::Status { status: 404, .. }),
        "expected Status 404 error, got: {err:?}"
    );
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_unauthorized_is_flagged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = AsyncHttpClient::new(base_url(&server), None, &TransportConfig::default()).unwrap();
    let err = client.get("rest").await.unwrap_err();
    assert!(err.is_unauthorized(), "got: {err:?}");
}

#[tokio::test]
async fn test_post_text_sends_command() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/items/Light"))
        .and(header("content-type", "text/plain"))
        .and(header_exists("authorization"))
        .and(body_string("ON"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let creds = credentials();
    let client =
        AsyncHttpClient::new(base_url(&server), Some(&creds), &TransportConfig::default()).unwrap();
    client.post_text("rest/items/Light", "ON").await.unwrap();
}

#[tokio::test]
async fn test_base_path_prefix_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/openhab/rest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let base = habconn_api::normalize_url(&format!("{}/openhab", server.uri())).unwrap();
    let client = AsyncHttpClient::new(base, None, &TransportConfig::default()).unwrap();
    assert_eq!(client.get("/rest").await.unwrap(), "{}");
}
