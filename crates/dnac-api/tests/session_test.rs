#![allow(clippy::unwrap_used)]
// Integration tests for `Session::login` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dnac_api::{AuthFlow, ControllerConfig, DnacClient, Error, Session};

// ── Helpers ─────────────────────────────────────────────────────────

/// `admin:secret`
const BASIC_ADMIN: &str = "Basic YWRtaW46c2VjcmV0";

fn config_for(server: &MockServer, flow: AuthFlow) -> ControllerConfig {
    let addr = server.address();
    let mut config = ControllerConfig::new(
        addr.ip().to_string(),
        "admin",
        SecretString::from("secret".to_string()),
    );
    config.port = addr.port();
    config.use_ssl = false;
    config.use_proxy = false;
    config.auth_flow = flow;
    config
}

// ── Token flow ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_token_login_installs_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dna/system/api/v1/auth/token"))
        .and(header("authorization", BASIC_ADMIN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Token": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::login(&config_for(&server, AuthFlow::Token))
        .await
        .unwrap();

    let headers = session.default_headers();
    assert_eq!(headers.get("x-auth-token").unwrap(), "abc123");
    assert_eq!(headers.get("content-type").unwrap(), "application/json");
}

#[tokio::test]
async fn test_session_reuses_token_on_later_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dna/system/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Token": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/group"))
        .and(header("x-auth-token", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": []})))
        .expect(2)
        .mount(&server)
        .await;

    let client = DnacClient::connect(&config_for(&server, AuthFlow::Token))
        .await
        .unwrap();

    client.fetch("api/v1/group").await.unwrap();
    client.fetch("api/v1/group").await.unwrap();
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dna/system/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .mount(&server)
        .await;

    let result = Session::login(&config_for(&server, AuthFlow::Token)).await;

    match result {
        Err(Error::Authentication { ref body, .. }) => assert_eq!(body, "Bad credentials"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_without_token_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dna/system/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "lowercase"})))
        .mount(&server)
        .await;

    let result = Session::login(&config_for(&server, AuthFlow::Token)).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_connection_refused() {
    let mut config = ControllerConfig::new(
        "127.0.0.1",
        "admin",
        SecretString::from("secret".to_string()),
    );
    config.port = 1;
    config.use_ssl = false;
    config.use_proxy = false;

    let result = Session::login(&config).await;

    assert!(
        matches!(result, Err(Error::Connection(_))),
        "expected Connection error, got: {result:?}"
    );
}

// ── Cookie flow ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_cookie_login_installs_cookie_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/system/v1/auth/login"))
        .and(header("authorization", BASIC_ADMIN))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "X-JWT-ACCESS-TOKEN=jwt42; Path=/; HttpOnly"),
        )
        .mount(&server)
        .await;

    let session = Session::login(&config_for(&server, AuthFlow::Cookie))
        .await
        .unwrap();

    assert_eq!(
        session.default_headers().get("cookie").unwrap(),
        "X-JWT-ACCESS-TOKEN=jwt42"
    );
    assert!(session.default_headers().get("x-auth-token").is_none());
}

#[tokio::test]
async fn test_cookie_login_without_set_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/system/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = Session::login(&config_for(&server, AuthFlow::Cookie)).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}
