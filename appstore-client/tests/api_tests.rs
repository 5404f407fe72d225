//! Integration tests for the API client against a fake backend.

mod support;

use client::{ClientError, RequestOptions};
use serde_json::json;
use shared::models::{AppDraft, AppListQuery, LoginRequest};
use support::{FakeBackend, PROFILE, client_with_token};

#[tokio::test]
async fn test_health_is_anonymous() {
    let backend = FakeBackend::new().respond("GET", "/", 200, r#"{"status":"ok"}"#);
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, Some("abc"));

    let payload = client.health().await.unwrap();

    assert_eq!(payload, json!({"status": "ok"}));
    let requests = backend.requests_to("/");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn test_list_apps_without_query_sends_no_parameters() {
    let backend = FakeBackend::new().respond("GET", "/apps", 200, r#"[{"id": 1, "name": "Neon"}]"#);
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, None);

    let query = AppListQuery {
        query: Some(String::new()),
        page: None,
        page_size: None,
    };
    let apps = client.list_apps(&query).await.unwrap();

    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].display_name(), "Neon");
    assert_eq!(backend.requests_to("/apps")[0].query, None);
}

#[tokio::test]
async fn test_list_apps_with_query() {
    let backend = FakeBackend::new().respond(
        "GET",
        "/apps",
        200,
        r#"{"items": [{"app_id": "x", "title": "Foo Finder"}], "total": 1}"#,
    );
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, Some("abc"));

    let apps = client
        .list_apps(&AppListQuery::search("foo").unwrap())
        .await
        .unwrap();

    assert_eq!(apps[0].id.as_deref(), Some("x"));
    assert_eq!(apps[0].name.as_deref(), Some("Foo Finder"));
    let request = &backend.requests_to("/apps")[0];
    assert_eq!(request.query.as_deref(), Some("query=foo"));
    assert_eq!(request.authorization, None);
}

#[tokio::test]
async fn test_get_app_encodes_identifier() {
    let backend = FakeBackend::new().respond("GET", "/apps/neon%20arcade", 200, r#"{"name": "Neon"}"#);
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, None);

    let app = client.get_app("neon arcade").await.unwrap();
    assert_eq!(app.display_name(), "Neon");
}

#[tokio::test]
async fn test_me_attaches_bearer_token() {
    let backend = FakeBackend::new().respond("GET", "/me", 200, PROFILE);
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, Some("abc"));

    let profile = client.me().await.unwrap();

    assert_eq!(profile.label(), "Ada");
    assert_eq!(
        backend.requests_to("/me")[0].authorization.as_deref(),
        Some("Bearer abc")
    );
}

#[tokio::test]
async fn test_authenticated_call_without_token_sends_no_header() {
    let backend = FakeBackend::new().respond("GET", "/admin/apps", 200, "[]");
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, None);

    assert!(client.admin_list_apps().await.unwrap().is_empty());
    assert_eq!(backend.requests_to("/admin/apps")[0].authorization, None);
}

#[tokio::test]
async fn test_request_returns_payload_unchanged() {
    let body = json!({
        "nested": {"list": [1, 2.5, "three", null, true]},
        "unicode": "néon ✨",
        "empty": {}
    });
    let backend = FakeBackend::new().respond("GET", "/echo", 200, &body.to_string());
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, None);

    let payload = client.request("/echo", RequestOptions::get()).await.unwrap();
    assert_eq!(payload, body);
}

#[tokio::test]
async fn test_non_json_success_body_is_wrapped() {
    let backend = FakeBackend::new().respond("GET", "/", 200, "OK");
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, None);

    assert_eq!(client.health().await.unwrap(), json!({"raw": "OK"}));
}

#[tokio::test]
async fn test_error_detail_is_normalized() {
    let backend = FakeBackend::new().respond(
        "POST",
        "/auth/login",
        401,
        r#"{"detail": "Invalid credentials"}"#,
    );
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, None);

    let err = client
        .login(&LoginRequest::new("a@b.com", "secret1").unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_error_plain_text_and_empty_bodies() {
    let backend = FakeBackend::new()
        .respond("GET", "/apps/1", 500, "upstream exploded")
        .respond("GET", "/apps/2", 404, "");
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, None);

    let err = client.get_app("1").await.unwrap_err();
    assert_eq!(err.to_string(), "upstream exploded");

    let err = client.get_app("2").await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status 404");
    assert!(matches!(err, ClientError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_admin_create_sends_json_with_credentials() {
    let backend = FakeBackend::new().respond(
        "POST",
        "/admin/apps",
        201,
        r#"{"id": 9, "name": "Neon"}"#,
    );
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, Some("admin-token"));

    let payload = AppDraft {
        name: " Neon ".into(),
        summary: "Glows".into(),
        ..AppDraft::default()
    }
    .validate()
    .unwrap();
    let created = client.admin_create_app(&payload).await.unwrap();

    assert_eq!(created.and_then(|app| app.id).as_deref(), Some("9"));
    let request = &backend.requests_to("/admin/apps")[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer admin-token"));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    let sent: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(sent, json!({"name": "Neon", "summary": "Glows"}));
}

#[tokio::test]
async fn test_admin_update_and_delete() {
    let backend = FakeBackend::new()
        .respond("PUT", "/admin/apps/9", 200, "")
        .respond("DELETE", "/admin/apps/9", 204, "");
    let base = backend.start().await;
    let (client, _) = client_with_token(&base, Some("admin-token"));

    let payload = AppDraft {
        name: "Neon".into(),
        description: "Glows brightly".into(),
        ..AppDraft::default()
    }
    .validate()
    .unwrap();

    assert_eq!(client.admin_update_app("9", &payload).await.unwrap(), None);
    client.admin_delete_app("9").await.unwrap();

    let requests = backend.requests_to("/admin/apps/9");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[1].method, "DELETE");
    assert_eq!(requests[1].content_type, None);
    assert!(requests[1].body.is_empty());
}

#[tokio::test]
async fn test_transport_failure_is_surfaced() {
    let (client, _) = client_with_token("http://127.0.0.1:1", None);

    let err = client.health().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
