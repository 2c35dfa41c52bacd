#![allow(clippy::unwrap_used)]
// Common-settings reconciliation against mock controllers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use reqwest::header::HeaderMap;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use dnac_api::{CommonSetting, DnacClient, Error, PollConfig, Session, SettingKind, SettingState};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DnacClient) {
    let server = MockServer::start().await;
    let session = Session::from_parts(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        HeaderMap::new(),
    );
    let client = DnacClient::new(session).with_poll(PollConfig {
        interval: Duration::from_millis(5),
        timeout: Some(Duration::from_secs(5)),
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/task/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"taskId": "t1", "endTime": 1, "isError": false}
        })))
        .mount(&server)
        .await;

    (server, client)
}

fn dns_value() -> Value {
    json!([{
        "domainName": "example.com",
        "primaryIpAddress": "10.0.0.1",
        "secondaryIpAddress": "10.0.0.2"
    }])
}

fn stored(key: &str, group: &str, value: Value) -> Value {
    json!({
        "instanceType": "dns",
        "instanceUuid": "b8a1-stored",
        "namespace": "global",
        "type": "dns.setting",
        "key": key,
        "value": value,
        "groupUuid": group,
        "inheritedGroupUuid": "",
        "inheritedGroupName": "",
        "version": 4
    })
}

async fn mount_stored(server: &MockServer, group: &str, entries: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/commonsetting/global/{group}")))
        .and(query_param("key", "dns.server"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": entries})))
        .mount(server)
        .await;
}

async fn posts(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST")
        .collect()
}

// ── Decisions ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_equal_value_issues_no_write() {
    let (server, client) = setup().await;
    mount_stored(&server, "-1", json!([stored("dns.server", "-1", dns_value())])).await;

    let outcome = client
        .reconcile(
            CommonSetting::new(SettingKind::Dns, dns_value()),
            "-1",
            SettingState::Present,
        )
        .await
        .unwrap();

    assert!(!outcome.changed);
    assert_eq!(outcome.message, "Already in desired state.");
    assert!(posts(&server).await.is_empty());
}

#[tokio::test]
async fn test_group_id_is_escaped_in_read_and_write() {
    let (server, client) = setup().await;
    mount_stored(&server, "lab%201%23b", json!([])).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/commonsetting/global/lab%201%23b"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"response": {"taskId": "t1"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client
        .reconcile(
            CommonSetting::new(SettingKind::Dns, dns_value()),
            "lab 1#b",
            SettingState::Present,
        )
        .await
        .unwrap();

    assert!(outcome.changed);
    let sent: Value = posts(&server).await[0].body_json().unwrap();
    assert_eq!(sent[0]["groupUuid"], "lab 1#b");
}

#[tokio::test]
async fn test_different_value_issues_one_create_with_group() {
    let (server, client) = setup().await;
    let group = "a7d3c1e2-site";
    mount_stored(
        &server,
        group,
        json!([stored("dns.server", group, json!([{"domainName": "old.example.com", "primaryIpAddress": "10.9.9.9"}]))]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(format!("/api/v1/commonsetting/global/{group}")))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"response": {"taskId": "t1"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client
        .reconcile(
            CommonSetting::new(SettingKind::Dns, dns_value()),
            group,
            SettingState::Present,
        )
        .await
        .unwrap();

    assert!(outcome.changed);

    let sent: Value = posts(&server).await[0].body_json().unwrap();
    assert_eq!(
        sent,
        json!([{
            "instanceType": "dns",
            "namespace": "global",
            "type": "dns.setting",
            "key": "dns.server",
            "value": dns_value(),
            "groupUuid": group
        }])
    );
    assert_eq!(outcome.proposed, Some(sent));
    assert_eq!(outcome.previous.unwrap()[0]["value"][0]["domainName"], "old.example.com");
}

#[tokio::test]
async fn test_missing_setting_is_created() {
    let (server, client) = setup().await;
    mount_stored(&server, "-1", json!([])).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/commonsetting/global/-1"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"response": {"taskId": "t1"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client
        .reconcile(
            CommonSetting::new(SettingKind::Dns, dns_value()),
            "-1",
            SettingState::Present,
        )
        .await
        .unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.previous, Some(json!([])));
}

#[tokio::test]
async fn test_absent_submits_empty_value() {
    let (server, client) = setup().await;
    mount_stored(&server, "-1", json!([stored("dns.server", "-1", dns_value())])).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/commonsetting/global/-1"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"response": {"taskId": "t1"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client
        .reconcile(
            CommonSetting::new(SettingKind::Dns, dns_value()),
            "-1",
            SettingState::Absent,
        )
        .await
        .unwrap();

    assert!(outcome.changed);
    let sent: Value = posts(&server).await[0].body_json().unwrap();
    assert_eq!(sent[0]["value"], json!([]));
}

#[tokio::test]
async fn test_empty_group_id_is_rejected() {
    let (server, client) = setup().await;

    let result = client
        .reconcile(
            CommonSetting::new(SettingKind::Ntp, json!(["10.0.0.5"])),
            "",
            SettingState::Present,
        )
        .await;

    assert!(matches!(result, Err(Error::GroupNotFound { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_check_mode_reports_pending_change_without_writing() {
    let (server, client) = setup().await;
    let client = client.with_check_mode(true);
    mount_stored(&server, "-1", json!([])).await;

    let outcome = client
        .reconcile(
            CommonSetting::new(SettingKind::Dns, dns_value()),
            "-1",
            SettingState::Present,
        )
        .await
        .unwrap();

    assert!(outcome.changed);
    assert!(outcome.proposed.is_some());
    assert!(posts(&server).await.is_empty());
}

// ── Idempotence ─────────────────────────────────────────────────────

/// Stateful commonsetting endpoint: POST replaces the stored entries.
struct SettingsStore {
    entries: Arc<Mutex<Vec<Value>>>,
}

impl Respond for SettingsStore {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut entries = self.entries.lock().unwrap();
        if request.method.as_str() == "POST" {
            *entries = request.body_json().unwrap();
            ResponseTemplate::new(202).set_body_json(json!({"response": {"taskId": "t1"}}))
        } else {
            ResponseTemplate::new(200).set_body_json(json!({"response": *entries}))
        }
    }
}

#[tokio::test]
async fn test_second_reconcile_is_a_no_op() {
    let (server, client) = setup().await;

    Mock::given(path("/api/v1/commonsetting/global/-1"))
        .respond_with(SettingsStore {
            entries: Arc::new(Mutex::new(Vec::new())),
        })
        .mount(&server)
        .await;

    let desired = CommonSetting::new(SettingKind::Dns, dns_value());

    let first = client
        .reconcile(desired.clone(), "-1", SettingState::Present)
        .await
        .unwrap();
    let second = client
        .reconcile(desired, "-1", SettingState::Present)
        .await
        .unwrap();

    assert!(first.changed);
    assert!(!second.changed);
    assert_eq!(posts(&server).await.len(), 1);
}
