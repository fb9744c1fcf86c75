use std::sync::Arc;

use assert_matches::assert_matches;
use reqwest::Method;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_gateway::{MemorySessionStore, RequestDispatcher, SessionStore};
use shared_models::error::ClientError;
use shared_utils::test_utils::MockBackendResponses;

fn dispatcher_with_token(token: Option<&str>) -> RequestDispatcher {
    let store = MemorySessionStore::new();
    if let Some(token) = token {
        store.save(token).unwrap();
    }
    RequestDispatcher::new(Arc::new(store))
}

#[tokio::test]
async fn test_login_and_register_carry_no_authorization() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_with_token(Some("stored.token.value"));
    dispatcher
        .send_for_text(Method::POST, &format!("{}/auth/login", mock_server.uri()), Some(json!({})))
        .await
        .unwrap();
    dispatcher
        .send_for_text(Method::POST, &format!("{}/auth/register", mock_server.uri()), Some(json!({})))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in requests {
        assert!(request.headers.get("authorization").is_none());
    }
}

#[tokio::test]
async fn test_other_requests_carry_bearer_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appointments/patient/1"))
        .and(header("Authorization", "Bearer stored.token.value"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_with_token(Some("stored.token.value"));
    let result: Vec<Value> = dispatcher
        .get_json(&format!("{}/appointments/patient/1", mock_server.uri()))
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_requests_without_token_are_forwarded_unauthenticated() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_with_token(None);
    let _: Vec<Value> = dispatcher
        .get_json(&format!("{}/api/v1/availability", mock_server.uri()))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_error_statuses_are_mapped() {
    let mock_server = MockServer::start().await;
    Mock::given(path("/conflict"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "Slot already booked",
            "details": "uri=/appointments/book"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(path("/forbidden"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_with_token(Some("t.t.t"));

    let err = dispatcher
        .send_no_content(Method::POST, &format!("{}/conflict", mock_server.uri()), Some(json!({})))
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Conflict("Slot already booked: uri=/appointments/book".to_string()));

    let err = dispatcher
        .get_json::<Value>(&format!("{}/missing", mock_server.uri()))
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::NotFound(_));

    let err = dispatcher
        .get_json::<Value>(&format!("{}/forbidden", mock_server.uri()))
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::Forbidden(_));
}

#[tokio::test]
async fn test_bad_request_carries_backend_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/appointments/book"))
        .respond_with(ResponseTemplate::new(400).set_body_json(MockBackendResponses::error_response(
            "Invalid slot",
            "uri=/appointments/book",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_with_token(Some("t.t.t"));
    let err = dispatcher
        .send_for_text(Method::POST, &format!("{}/appointments/book", mock_server.uri()), Some(json!({})))
        .await
        .unwrap_err();

    assert_eq!(err, ClientError::BadRequest("Invalid slot: uri=/appointments/book".to_string()));
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_unreachable_backend_is_connectivity() {
    let dispatcher = dispatcher_with_token(None);
    let err = dispatcher
        .get_json::<Value>("http://127.0.0.1:9/appointments/patient/1")
        .await
        .unwrap_err();

    assert_matches!(err, ClientError::Connectivity(_));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_empty_json_body_is_decode_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_with_token(None);
    let err = dispatcher
        .get_json::<Value>(&format!("{}/anything", mock_server.uri()))
        .await
        .unwrap_err();

    assert_matches!(err, ClientError::Decode(_));
}
