//! List adapter tests against a mocked backend and a live server.

mod common;

use std::sync::{Arc, Mutex};

use gym_admin_api::client::{ApiClient, ListRequest, Notifier, TableData};
use gym_admin_api::seed::demo_repositories;
use gym_admin_api::{create_router, AppState};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Remembers every notification instead of logging it.
#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

fn adapter(base_url: &str) -> (ApiClient, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    (ApiClient::new(base_url, notifier.clone()), notifier)
}

fn envelope(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 200,
        "message": "success",
        "data": data,
        "request_id": "test-request"
    }))
}

// ============================================================================
// Response shapes
// ============================================================================

#[tokio::test]
async fn bare_array_is_counted_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/logs"))
        .respond_with(envelope(json!([{"id": 1}, {"id": 2}])))
        .mount(&server)
        .await;
    let (client, notifier) = adapter(&server.uri());

    let table = client.fetch_list("/api/admin/logs", &ListRequest::new()).await;

    assert_eq!(table.total, 2);
    assert!(table.success);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn keyed_shape_uses_server_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/membership-types"))
        .and(query_param("skip", "10"))
        .and(query_param("limit", "10"))
        .respond_with(envelope(json!({"total": 14, "items": [{"id": 11}, {"id": 12}]})))
        .mount(&server)
        .await;
    let (client, _) = adapter(&server.uri());

    let table = client
        .fetch_list("/api/admin/membership-types", &ListRequest::new().page(2, 10))
        .await;

    assert_eq!(
        table,
        TableData {
            data: vec![json!({"id": 11}), json!({"id": 12})],
            success: true,
            total: 14,
        }
    );
}

#[tokio::test]
async fn partial_ranges_are_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/memberships"))
        .and(query_param("status", "active"))
        .and(query_param_is_missing("remaining_sessions_min"))
        .and(query_param_is_missing("purchased_at_start"))
        .and(query_param_is_missing("purchased_at_end"))
        .respond_with(envelope(json!({"total": 0, "memberships": []})))
        .expect(1)
        .mount(&server)
        .await;
    let (client, notifier) = adapter(&server.uri());

    let request = ListRequest::new()
        .text("status", "active")
        .range("remaining_sessions", Some(5), None)
        .date_range("purchased_at", None::<String>, Some("2025-04-30"));
    let table = client.fetch_list("/api/admin/memberships", &request).await;

    assert!(table.success);
    assert!(notifier.messages().is_empty());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn error_envelope_yields_empty_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": 500,
            "message": "storage unavailable",
            "data": null,
            "request_id": "r-1"
        })))
        .mount(&server)
        .await;
    let (client, notifier) = adapter(&server.uri());

    let table = client.fetch_list("/api/admin/coaches", &ListRequest::new()).await;

    assert_eq!(table, TableData::failure());
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("storage unavailable"));
}

#[tokio::test]
async fn non_json_error_is_reported_by_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;
    let (client, notifier) = adapter(&server.uri());

    let table = client.fetch_list("/api/admin/coaches", &ListRequest::new()).await;

    assert_eq!(table, TableData::failure());
    assert_eq!(notifier.messages().len(), 1);
    assert!(notifier.messages()[0].contains("502"));
}

#[tokio::test]
async fn transport_failure_yields_empty_failure() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);
    let (client, notifier) = adapter(&uri);

    let table = client.fetch_list("/api/admin/coaches", &ListRequest::new()).await;

    assert_eq!(table, TableData::failure());
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn get_list_propagates_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "message": "Missing bearer token",
            "data": null,
            "request_id": "r-2"
        })))
        .mount(&server)
        .await;
    let (client, notifier) = adapter(&server.uri());

    let err = client
        .get_list("/api/admin/coaches", &ListRequest::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        gym_admin_api::client::ClientError::Api { code: 401, .. }
    ));
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(envelope(json!({"total": 0, "coaches": []})))
        .expect(1)
        .mount(&server)
        .await;
    let (client, _) = adapter(&server.uri());

    let table = client
        .with_token("abc")
        .fetch_list("/api/admin/coaches", &ListRequest::new())
        .await;

    assert!(table.success);
}

// ============================================================================
// Live server
// ============================================================================

#[tokio::test]
async fn login_then_list_against_live_server() {
    let uploads = TempDir::new().unwrap();
    let state = Arc::new(
        AppState::new(common::test_settings(&uploads, true), demo_repositories()).unwrap(),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    let (mut client, notifier) = adapter(&format!("http://{}", addr));

    let denied = client.fetch_list("/api/admin/coaches", &ListRequest::new()).await;
    assert!(!denied.success);
    assert_eq!(notifier.messages().len(), 1);

    let login = client
        .login(common::ADMIN_IDENTIFIER, common::ADMIN_PASSWORD)
        .await
        .unwrap();
    assert_eq!(login.token_type, "Bearer");
    assert_eq!(client.token(), Some(login.access_token.as_str()));

    let table = client
        .fetch_list(
            "/api/admin/coaches",
            &ListRequest::new().page(1, 2).text("status", "active"),
        )
        .await;
    assert!(table.success);
    assert_eq!(table.total, 2);
    assert_eq!(table.data.len(), 2);

    let appointments = client
        .fetch_list(
            "/api/admin/appointments",
            &ListRequest::new().date_range("appointment", Some("2025-04-16"), None::<String>),
        )
        .await;
    assert_eq!(appointments.total, 3);
    assert_eq!(notifier.messages().len(), 1);
}
