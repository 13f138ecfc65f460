#![allow(clippy::unwrap_used)]
// State-machine tests for `SwitchSession` against a wiremock backend.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portscout_core::{
    BackendClient, ConnectParams, ConnectionState, CoreError, MemoryTokenStore, SessionManager,
    SessionToken, Severity, SwitchSession,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_authenticated() -> (MockServer, SwitchSession) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = BackendClient::with_client(reqwest::Client::new(), base_url);

    let manager = SessionManager::new(Arc::new(MemoryTokenStore::new()));
    manager.login(SessionToken::new("aaa.bbb.ccc")).unwrap();

    (server, SwitchSession::new(client, manager))
}

fn params(ip: &str) -> ConnectParams {
    ConnectParams {
        ip: ip.into(),
        username: "netops".into(),
        password: "sw-secret".to_string().into(),
    }
}

fn snapshot_json(hostname: &str) -> serde_json::Value {
    json!({
        "hostname": hostname,
        "uptime": "1 week, 3 days",
        "disconnected_ports": [
            {
                "port": "Gi1/0/3",
                "description": "spare",
                "vlan": "20",
                "last_input": "never",
                "input_packets": "0",
                "output_packets": "1204",
                "usage_percentage": 0.0
            }
        ],
        "poe_status": null,
        "lowest_usage_interface": null
    })
}

async fn mount_connect_ok(server: &MockServer, hostname: &str) {
    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_json(hostname)))
        .mount(server)
        .await;
}

// ── Connect ─────────────────────────────────────────────────────────

#[tokio::test]
async fn connect_success_stores_snapshot_and_ip() {
    let (server, session) = setup_authenticated().await;
    mount_connect_ok(&server, "sw1").await;

    assert_eq!(session.state(), ConnectionState::Disconnected);
    assert!(session.snapshot().is_none());

    let snapshot = session.connect(params("10.0.0.2")).await.unwrap();

    assert_eq!(snapshot.hostname, "sw1");
    assert_eq!(session.state(), ConnectionState::Connected);
    assert_eq!(session.snapshot().unwrap().hostname, "sw1");
    assert_eq!(session.connected_ip().as_deref(), Some("10.0.0.2"));
}

#[tokio::test]
async fn connect_success_emits_hostname_notice() {
    let (server, session) = setup_authenticated().await;
    mount_connect_ok(&server, "sw-lab-01").await;

    let mut notices = session.subscribe_notices();
    session.connect(params("10.0.0.2")).await.unwrap();

    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.severity, Severity::Info);
    assert!(notice.detail.contains("sw-lab-01"), "detail: {}", notice.detail);
}

#[tokio::test]
async fn connect_failure_returns_to_disconnected() {
    let (server, session) = setup_authenticated().await;

    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "SSH authentication failed"})),
        )
        .mount(&server)
        .await;

    let mut notices = session.subscribe_notices();
    let result = session.connect(params("10.0.0.2")).await;

    assert!(result.is_err());
    assert_eq!(session.state(), ConnectionState::Disconnected);
    assert!(session.snapshot().is_none(), "no snapshot on failure");
    assert!(session.connected_ip().is_none());

    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.severity, Severity::Error);
}

#[tokio::test]
async fn connect_without_login_is_rejected() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = BackendClient::with_client(reqwest::Client::new(), base_url);
    let manager = SessionManager::new(Arc::new(MemoryTokenStore::new()));
    manager.initialize().unwrap();
    let session = SwitchSession::new(client, manager);

    let result = session.connect(params("10.0.0.2")).await;

    assert!(matches!(result, Err(CoreError::AuthRequired)));
    assert_eq!(session.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn connect_while_connected_is_rejected() {
    let (server, session) = setup_authenticated().await;
    mount_connect_ok(&server, "sw1").await;

    session.connect(params("10.0.0.2")).await.unwrap();
    let result = session.connect(params("10.0.0.3")).await;

    assert!(matches!(result, Err(CoreError::ConnectInProgress)));
    // The established session is untouched.
    assert_eq!(session.state(), ConnectionState::Connected);
    assert_eq!(session.connected_ip().as_deref(), Some("10.0.0.2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn connect_while_connecting_is_rejected() {
    let (server, session) = setup_authenticated().await;

    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(snapshot_json("sw1"))
                .set_delay(Duration::from_millis(250)),
        )
        .mount(&server)
        .await;

    let racing = {
        let session = session.clone();
        tokio::spawn(async move { session.connect(params("10.0.0.2")).await })
    };

    // Wait until the first attempt is holding the Connecting state.
    let mut state = session.watch_state();
    state
        .wait_for(|s| *s == ConnectionState::Connecting)
        .await
        .unwrap();

    let second = session.connect(params("10.0.0.3")).await;
    assert!(matches!(second, Err(CoreError::ConnectInProgress)));

    // Disconnect mid-connect is rejected too -- the documented policy.
    let disco = session.disconnect().await;
    assert!(matches!(disco, Err(CoreError::ConnectInProgress)));

    let first = racing.await.unwrap();
    assert!(first.is_ok());
    assert_eq!(session.state(), ConnectionState::Connected);
}

// ── Disconnect ──────────────────────────────────────────────────────

#[tokio::test]
async fn disconnect_clears_snapshot_and_state() {
    let (server, session) = setup_authenticated().await;
    mount_connect_ok(&server, "sw1").await;

    Mock::given(method("POST"))
        .and(path("/api/disconnect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "disconnected"})))
        .mount(&server)
        .await;

    session.connect(params("10.0.0.2")).await.unwrap();
    session.disconnect().await.unwrap();

    assert_eq!(session.state(), ConnectionState::Disconnected);
    assert!(session.snapshot().is_none());
    assert!(session.connected_ip().is_none());
}

#[tokio::test]
async fn disconnect_resets_locally_even_when_backend_fails() {
    let (server, session) = setup_authenticated().await;
    mount_connect_ok(&server, "sw1").await;

    Mock::given(method("POST"))
        .and(path("/api/disconnect"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"detail": "Failed to disconnect properly"})),
        )
        .mount(&server)
        .await;

    session.connect(params("10.0.0.2")).await.unwrap();

    let mut notices = session.subscribe_notices();
    session.disconnect().await.unwrap();

    // Local state always wins; reconnecting stays possible.
    assert_eq!(session.state(), ConnectionState::Disconnected);
    assert!(session.snapshot().is_none());

    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.severity, Severity::Error);

    session.connect(params("10.0.0.2")).await.unwrap();
    assert_eq!(session.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn disconnect_when_already_disconnected_is_a_noop() {
    let (_server, session) = setup_authenticated().await;

    session.disconnect().await.unwrap();
    assert_eq!(session.state(), ConnectionState::Disconnected);
}
