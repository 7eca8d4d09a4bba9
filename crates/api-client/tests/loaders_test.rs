//! Page loader tests against a mock backend

use std::sync::Arc;
use std::time::{Duration, Instant};

use console_client::{
    ApiClient, AuthBoundary, ClientConfig, LoaderError, Loaders, RouteChannel, LOGIN_ROUTE,
};
use console_core::models::MemberRole;
use console_core::session::{Credential, Session};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn loaders_for(server: &MockServer, session: Session) -> (Loaders, RouteChannel) {
    let routes = RouteChannel::new();
    let client = ApiClient::new(&ClientConfig::new(server.uri()), session.clone()).unwrap();
    let boundary = AuthBoundary::new(session, Arc::new(routes.clone()));
    (Loaders::new(client, boundary), routes)
}

async fn mount_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "u1", "email": "a@b.c"})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_api_keys_admin_fails_fast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations/o1/user-api-keys"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/organizations/o1/projects"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (loaders, _routes) = loaders_for(&server, Session::with_credential(Credential::new("T1")));

    let started = Instant::now();
    let err = loaders.api_keys_admin("o1").await.unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(2));

    match err {
        LoaderError::Page { status, message } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "Failed to load API keys");
        }
        other => panic!("expected page error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_keys_admin_merges_both_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations/o1/user-api-keys"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"_id": "k1", "name": "ci"}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/organizations/o1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "p1", "name": "Bot", "organization": "o1"}
        ])))
        .mount(&server)
        .await;

    let (loaders, _routes) = loaders_for(&server, Session::with_credential(Credential::new("T1")));
    let data = loaders.api_keys_admin("o1").await.unwrap();

    assert_eq!(data.api_keys[0].name, "ci");
    assert_eq!(data.projects[0].id, "p1");
    assert_eq!(data.organization_id, "o1");
}

#[tokio::test]
async fn test_app_layout_resolves_member_role() {
    let server = MockServer::start().await;
    mount_profile(&server).await;
    Mock::given(method("GET"))
        .and(path("/organizations/o1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "o1",
            "name": "Acme",
            "owner": "u9",
            "members": [
                {"user": {"_id": "u9"}, "role": "owner"},
                {"user": {"_id": "u1"}, "role": "admin"}
            ]
        })))
        .mount(&server)
        .await;

    let (loaders, _routes) = loaders_for(&server, Session::with_credential(Credential::new("T1")));

    let data = loaders.app_layout(Some("o1")).await;
    assert_eq!(data.user.as_ref().map(|u| u.id.as_str()), Some("u1"));
    assert_eq!(data.role, Some(MemberRole::Admin));

    let data = loaders.app_layout(None).await;
    assert!(data.user.is_some());
    assert_eq!(data.role, None);
}

#[tokio::test]
async fn test_app_layout_without_session_renders_logged_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = Session::with_credential(Credential::new("stale"));
    let (loaders, routes) = loaders_for(&server, session.clone());

    let data = loaders.app_layout(None).await;
    assert_eq!(data.user, None);
    assert_eq!(session.get(), None);
    assert_eq!(routes.current().as_deref(), Some(LOGIN_ROUTE));
}

#[tokio::test]
async fn test_app_layout_accepts_profile_with_both_id_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "u1",
            "id": "u1",
            "email": "a@b.c"
        })))
        .mount(&server)
        .await;

    let session = Session::with_credential(Credential::new("T1"));
    let (loaders, _routes) = loaders_for(&server, session);

    let data = loaders.app_layout(None).await;
    assert_eq!(data.user.map(|user| user.id).as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_server_layout_uses_cookie_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", "Bearer C1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"_id": "u1", "email": "a@b.c"})),
        )
        .mount(&server)
        .await;

    // The store holds nothing; only the cookie authenticates this request.
    let (loaders, _routes) = loaders_for(&server, Session::in_memory());

    let data = loaders
        .app_layout_server(Some("theme=dark; token=C1"))
        .await
        .unwrap();
    assert_eq!(data.user.map(|u| u.email), Some("a@b.c".to_string()));

    let data = loaders
        .app_layout_server(Some("token=revoked"))
        .await
        .unwrap();
    assert_eq!(data.user, None);

    match loaders.app_layout_server(None).await {
        Err(LoaderError::Redirect { location, .. }) => assert_eq!(location, LOGIN_ROUTE),
        other => panic!("expected redirect, got {:?}", other),
    }
}

#[tokio::test]
async fn test_org_layout_carries_organization_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "o1", "name": "Acme", "owner": "u1"}
        ])))
        .mount(&server)
        .await;

    let (loaders, _routes) = loaders_for(&server, Session::with_credential(Credential::new("T1")));
    let data = loaders.org_layout(Some("o1")).await.unwrap();
    assert_eq!(data.organizations.len(), 1);
    assert_eq!(data.organization_id.as_deref(), Some("o1"));

    let home = loaders.app_home().await.unwrap();
    assert_eq!(home.organizations, data.organizations);

    let passed = loaders.handoffs(data.clone());
    assert_eq!(passed, data);
}
