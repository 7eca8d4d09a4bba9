//! Request contract tests against a mock backend

use std::sync::Arc;

use console_client::{
    ApiClient, ApiError, AuthBoundary, ClientConfig, ErrorKind, RequestOptions, RouteChannel,
    APP_HOME_ROUTE, LOGIN_ROUTE,
};
use console_core::models::CreateOrganizationRequest;
use console_core::path::ApiPath;
use console_core::session::{Credential, Session};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, session: Session) -> ApiClient {
    ApiClient::new(&ClientConfig::new(server.uri()), session).unwrap()
}

fn boundary_for(session: &Session) -> (AuthBoundary, RouteChannel) {
    let routes = RouteChannel::new();
    (
        AuthBoundary::new(session.clone(), Arc::new(routes.clone())),
        routes,
    )
}

#[tokio::test]
async fn test_bearer_header_follows_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let session = Session::with_credential(Credential::new("abc"));
    let client = client_for(&server, session.clone());
    assert!(client.organizations().await.unwrap().is_empty());

    session.clear();
    client.organizations().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].headers.get("authorization").unwrap(),
        "Bearer abc"
    );
    assert_eq!(
        requests[0].headers.get("content-type").unwrap(),
        "application/json"
    );
    assert!(requests[1].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unauthorized_ends_session_without_reading_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_string("<html>not json"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::with_credential(Credential::new("expired"));
    let client = client_for(&server, session.clone());
    let (boundary, routes) = boundary_for(&session);

    let err = boundary.guard(client.profile().await).unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated));
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    assert_eq!(session.get(), None);
    assert_eq!(routes.current().as_deref(), Some(LOGIN_ROUTE));
}

#[tokio::test]
async fn test_forbidden_goes_home_and_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations/o1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let session = Session::with_credential(Credential::new("T1"));
    let client = client_for(&server, session.clone());
    let (boundary, routes) = boundary_for(&session);

    let err = boundary.guard(client.organization("o1").await).unwrap_err();
    assert!(matches!(err, ApiError::Forbidden));
    assert!(err.is_unauthorized());
    assert_eq!(session.get(), Some(Credential::new("T1")));
    assert_eq!(routes.current().as_deref(), Some(APP_HOME_ROUTE));
}

#[tokio::test]
async fn test_sign_in_stores_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "a@b.c", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T1"})))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let client = client_for(&server, session.clone());
    let (boundary, _routes) = boundary_for(&session);

    let credential = boundary.sign_in(&client, "a@b.c", "pw").await.unwrap();
    assert_eq!(credential, Credential::new("T1"));
    assert_eq!(session.get(), Some(Credential::new("T1")));
}

#[tokio::test]
async fn test_rejected_login_reports_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "nope"})))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let client = client_for(&server, session.clone());

    let err = client.login("a@b.c", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(session.get(), None);
}

#[tokio::test]
async fn test_create_organization_returns_created_object() {
    let server = MockServer::start().await;
    let created = json!({"_id": "o1", "name": "Acme", "owner": "u1"});
    Mock::given(method("POST"))
        .and(path("/organizations"))
        .and(body_json(json!({"name": "Acme"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(created.clone()))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::with_credential(Credential::new("T1")));
    let org = client
        .create_organization(&CreateOrganizationRequest::new("Acme"))
        .await
        .unwrap();

    assert_eq!(serde_json::to_value(&org).unwrap(), created);
}

#[tokio::test]
async fn test_create_organization_failure_uses_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/organizations"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "name taken"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Session::with_credential(Credential::new("T1")));
    let err = client
        .create_organization(&CreateOrganizationRequest::new("Acme"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to create organization");
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn test_fixed_messages_ignore_server_message() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not here"})))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::with_credential(Credential::new("T1")));

    let err = client.organization("o1").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch organizations");

    let err = client.prompt("o1", "p1", "x1").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to get prompt");

    let err = client.prompt_executions("o1", "p1", "x1", 2).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to get prompt executions");

    let err = client.remove_member("o1", "u2").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to delete user to organization");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_server_message_with_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/organizations/o1/projects"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Project exists"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());

    let err = client.create_project("o1", "p", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Project exists");

    let err = client.register("n", "a@b.c", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), "Registration failed");
}

#[tokio::test]
async fn test_identifiers_cannot_escape_their_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    client.projects("a/b?c").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/organizations/a%2Fb%3Fc/projects");
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_dot_and_empty_identifiers_are_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());

    let err = client.delete_prompt("o1", "p1", "..").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    assert!(matches!(
        client.project("o1", "..").await,
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        client.project("o1", "").await,
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        client.projects(".").await,
        Err(ApiError::InvalidInput(_))
    ));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_execution_history_requests_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/proxy/organizations/o1/projects/p1/prompts/x1/executions"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "executions": [{"_id": "e1", "output": "hi"}],
            "totalPages": 3
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let page = client.prompt_executions("o1", "p1", "x1", 0).await.unwrap();

    assert_eq!(page.total_pages, Some(3));
    assert_eq!(page.executions[0].id, "e1");
    assert_eq!(page.executions[0].extra["output"], "hi");
}

#[tokio::test]
async fn test_caller_headers_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/proxy/test-prompt/"))
        .and(header("content-type", "text/plain"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let options = RequestOptions::post().header(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    let response = client
        .request(
            &ApiPath::root("proxy").segment("test-prompt").trailing_slash(),
            options,
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_chat_stream_yields_frames() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/organizations/o1/projects/p1/agents/a1/chat/stream"))
        .and(header("accept", "text/event-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "data: {\"delta\":\"Hel\"}\n\ndata: {\"delta\":\"lo\"}\n\ndata: [DONE]\n\n",
            "text/event-stream",
        ))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::with_credential(Credential::new("T1")));
    let mut stream = client
        .chat_stream(
            "o1",
            "p1",
            "a1",
            &console_core::models::ChatRequest::new("hi"),
        )
        .await
        .unwrap();

    let mut text = String::new();
    while let Some(event) = stream.next_event().await.unwrap() {
        if event.is_done() {
            break;
        }
        let delta: serde_json::Value = event.json().unwrap();
        text.push_str(delta["delta"].as_str().unwrap());
    }
    assert_eq!(text, "Hello");
}

#[tokio::test]
async fn test_undecodable_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let err = client.providers().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}
