use super::*;
use crate::config::ClientConfig;
use crate::error::ClientErrorStatus;
use crate::request::{HttpMethod, MockHttpClient};
use crate::token::{MemoryTokenStore, TokenStore, fake_jwt};
use serde_json::{Value, json};
use std::rc::Rc;
use taskflow_shared::{LogAction, Token};

const BASE: &str = "http://api.test";

type TestApi = ApiClient<Rc<MockHttpClient>, Rc<MemoryTokenStore>>;

fn setup() -> (Rc<MockHttpClient>, Rc<MemoryTokenStore>, TestApi) {
    let http = Rc::new(MockHttpClient::new());
    let store = Rc::new(MemoryTokenStore::new());
    let api = ApiClient::new(http.clone(), store.clone(), ClientConfig::new(BASE));
    (http, store, api)
}

fn url(path: &str) -> String {
    format!("{}/{}", BASE, path)
}

fn sent_body(http: &MockHttpClient, index: usize) -> Value {
    let requests = http.requests.borrow();
    serde_json::from_str(requests[index].3.as_deref().unwrap()).unwrap()
}

// =========================================================
// Tasks / Users
// =========================================================

#[tokio::test]
async fn tenant_domain_lists_tasks_by_area() {
    let (http, _, api) = setup();
    http.mock_response(HttpMethod::Get, &url("tasks/area"), 200, json!([{ "id": "t1" }]));
    http.mock_response(HttpMethod::Get, &url("tasks"), 200, json!([]));

    let tasks = api.tasks().list_for_domain(false).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(http.calls(), vec!["GET http://api.test/tasks/area"]);

    api.tasks().list_for_domain(true).await.unwrap();
    assert_eq!(http.calls()[1], "GET http://api.test/tasks");
}

#[tokio::test]
async fn assigned_tasks_use_user_path() {
    let (http, _, api) = setup();
    http.mock_response(
        HttpMethod::Get,
        &url("tasks/user"),
        200,
        json!([{ "id": "t1", "assignedTo": "u1" }]),
    );

    let tasks = api.tasks().list_assigned().await.unwrap();
    assert_eq!(tasks[0].assigned_to, "u1");
}

#[tokio::test]
async fn user_lookup_by_email() {
    let (http, _, api) = setup();
    http.mock_response(
        HttpMethod::Get,
        &url("users/email/ana%40x.com"),
        200,
        json!({ "id": "u1", "email": "ana@x.com", "roleId": "r1" }),
    );
    http.mock_response(HttpMethod::Get, &url("users/email/nobody%40x.com"), 200, Value::Null);

    let user = api.users().get_by_email("ana@x.com").await.unwrap().unwrap();
    assert_eq!(user.role_id, "r1");
    assert_eq!(api.users().get_by_email("nobody@x.com").await.unwrap(), None);
}

#[tokio::test]
async fn email_lookup_encodes_reserved_characters() {
    let (http, _, api) = setup();
    http.mock_response(
        HttpMethod::Get,
        &url("users/email/ana%2Bqa%40x.com"),
        200,
        json!({ "id": "u7", "email": "ana+qa@x.com" }),
    );

    let user = api.users().get_by_email(" ana+qa@x.com ").await.unwrap().unwrap();
    assert_eq!(user.id, "u7");
    assert_eq!(http.calls(), vec!["GET http://api.test/users/email/ana%2Bqa%40x.com"]);
}

#[tokio::test]
async fn service_errors_carry_operation_trace() {
    let (http, _, api) = setup();
    http.mock_response(HttpMethod::Delete, &url("areas/a1"), 403, json!({}));

    let err = api.areas().delete("a1").await.unwrap_err();
    assert_eq!(err.status, ClientErrorStatus::Http(403));
    let ops: Vec<_> = err.spans().iter().map(|s| s.operation.as_str()).collect();
    assert_eq!(ops, vec!["api.DELETE", "areas.delete"]);
}

// =========================================================
// Logs
// =========================================================

#[tokio::test]
async fn logs_sorted_newest_first_with_system_label() {
    let (http, _, api) = setup();
    http.mock_response(
        HttpMethod::Get,
        &url("logs"),
        200,
        json!({ "data": [
            { "id": "l1", "userId": "u1", "action": "LOGIN", "timestamp": "2024-01-01T10:00:00Z" },
            { "id": "l2", "userId": SYSTEM_USER_ID, "action": "CREATE_TASK", "timestamp": "2024-03-01T10:00:00Z" },
            { "id": "l3", "userId": "u2", "action": "LOGOUT", "timestamp": "2024-02-01T10:00:00Z" }
        ]}),
    );

    let logs = api.logs().list_all().await.unwrap();
    let ids: Vec<_> = logs.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["l2", "l3", "l1"]);
    assert_eq!(logs[0].user_id, SYSTEM_USER_LABEL);
    assert_eq!(logs[0].action, LogAction::CreateTask);
}

#[tokio::test]
async fn logs_by_area_path() {
    let (http, _, api) = setup();
    http.mock_response(HttpMethod::Get, &url("logs/area/a7"), 200, json!({ "data": [] }));

    assert!(api.logs().list_by_area("a7").await.unwrap().is_empty());
    assert_eq!(http.calls(), vec!["GET http://api.test/logs/area/a7"]);
}

// =========================================================
// Auth
// =========================================================

fn credentials() -> Credentials {
    Credentials {
        email: "ana@x.com".into(),
        password: "secreto1".into(),
        area_id: "8a1b6a7e-4d5c-4f1a-9f23-3a8c5e6b7d41".into(),
    }
}

#[tokio::test]
async fn sign_in_persists_wrapped_token() {
    let (http, store, api) = setup();
    let jwt = fake_jwt(json!({ "id": "u1" }));
    http.mock_response(HttpMethod::Post, &url("auth/login"), 200, json!({ "token": jwt }));

    let token = api.auth().sign_in(&credentials()).await.unwrap();
    assert_eq!(token.as_str(), jwt);
    assert_eq!(store.load(), Some(Token(jwt)));
    assert_eq!(
        sent_body(&http, 0),
        json!({
            "email": "ana@x.com",
            "password": "secreto1",
            "areaId": "8a1b6a7e-4d5c-4f1a-9f23-3a8c5e6b7d41"
        })
    );
}

#[tokio::test]
async fn sign_up_accepts_bare_token() {
    let (http, store, api) = setup();
    http.mock_response(HttpMethod::Post, &url("auth/register"), 201, json!("bare-token"));

    let registration = Registration {
        name: "Ana".into(),
        email: "ana@x.com".into(),
        password: "secreto1".into(),
        area_id: "a1".into(),
    };
    api.auth().sign_up(&registration).await.unwrap();
    assert_eq!(store.load(), Some(Token("bare-token".into())));
}

#[tokio::test]
async fn rejected_sign_in_is_invalid_credentials() {
    let (http, store, api) = setup();
    http.mock_response(HttpMethod::Post, &url("auth/login"), 401, json!({ "message": "no" }));

    let err = api.auth().sign_in(&credentials()).await.unwrap_err();
    assert_eq!(err.status, ClientErrorStatus::InvalidCredentials);
    assert_eq!(err.message(), "Los credenciales no son validos en esta sucursal");
    assert_eq!(store.load(), None);
}

#[tokio::test]
async fn response_without_token_is_invalid_credentials() {
    let (http, store, api) = setup();
    http.mock_response(HttpMethod::Post, &url("auth/login"), 200, json!({ "ok": true }));

    let err = api.auth().sign_in(&credentials()).await.unwrap_err();
    assert_eq!(err.status, ClientErrorStatus::InvalidCredentials);
    assert_eq!(store.load(), None);
}

#[tokio::test]
async fn sign_up_with_missing_fields_sends_nothing() {
    let (http, _, api) = setup();
    let registration = Registration {
        name: " ".into(),
        email: "ana@x.com".into(),
        password: "secreto1".into(),
        area_id: "a1".into(),
    };

    let err = api.auth().sign_up(&registration).await.unwrap_err();
    assert_eq!(err.status, ClientErrorStatus::InvalidInput);
    assert!(http.calls().is_empty());
}

#[tokio::test]
async fn sign_out_clears_token() {
    let (_, store, api) = setup();
    store.persist(&Token("abc".into()));

    api.auth().sign_out();
    api.auth().sign_out();
    assert_eq!(store.load(), None);
}
