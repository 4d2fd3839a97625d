use super::*;
use crate::config::ClientConfig;
use crate::request::{HttpMethod, MockHttpClient};
use crate::token::{MemoryTokenStore, fake_jwt};
use crate::viewmodels::MergeState;
use serde_json::{Value, json};
use std::rc::Rc;
use taskflow_shared::permission::{MANAGER_ROLE_ID, VIEWER_ROLE_ID};

const BASE: &str = "http://api.test";

type Vm = TasksViewModel<Rc<MockHttpClient>, Rc<MemoryTokenStore>>;

fn url(path: &str) -> String {
    format!("{}/{}", BASE, path)
}

fn domain(is_main_domain: bool) -> DomainInfo {
    DomainInfo {
        area_id: Some("2".into()),
        is_main_domain,
    }
}

fn setup(role_id: &str, is_main_domain: bool) -> (Rc<MockHttpClient>, Vm) {
    let http = Rc::new(MockHttpClient::new());
    let jwt = fake_jwt(json!({ "id": "u-me", "areaId": "2", "roleId": role_id }));
    let store = Rc::new(MemoryTokenStore::with_token(&jwt));
    let api = ApiClient::new(http.clone(), store, ClientConfig::new(BASE));
    (http, TasksViewModel::new(api, domain(is_main_domain)))
}

fn mock_lists(http: &MockHttpClient, tasks_path: &str) {
    http.mock_response(
        HttpMethod::Get,
        &url(tasks_path),
        200,
        json!([
            { "id": "t1", "title": "Revisar planilla", "status": "PENDING", "areaId": "2", "assignedTo": "u2" },
            { "id": "t2", "title": "Inventario", "description": "Contar bodega", "status": "DONE", "areaId": "3" },
            { "id": "t3", "title": "Cierre mensual", "status": "IN_PROGRESS", "areaId": "2" }
        ]),
    );
    http.mock_response(
        HttpMethod::Get,
        &url("users"),
        200,
        json!({ "data": [
            { "id": "u2", "name": "Ana", "areaId": "2" },
            { "id": "u3", "name": "Luis", "areaId": "3" }
        ]}),
    );
    http.mock_response(
        HttpMethod::Get,
        &url("areas"),
        200,
        json!([{ "id": "2", "title": "Jinotepe" }, { "id": "3", "title": "Nandaime" }]),
    );
}

// =========================================================
// 加载
// =========================================================

#[tokio::test]
async fn tenant_domain_fetches_tasks_by_area() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, false);
    mock_lists(&http, "tasks/area");

    vm.load().await;

    assert_eq!(vm.state.load, LoadState::Ready);
    assert_eq!(vm.state.tasks.len(), 3);
    let calls = http.calls();
    assert!(calls.contains(&"GET http://api.test/tasks/area".to_string()));
    assert!(!calls.contains(&"GET http://api.test/tasks".to_string()));
}

#[tokio::test]
async fn main_domain_fetches_all_tasks() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, true);
    mock_lists(&http, "tasks");

    vm.load().await;

    assert_eq!(vm.state.load, LoadState::Ready);
    assert_eq!(vm.state.user_name("u2"), "Ana");
    assert_eq!(vm.state.area_title("3"), "Nandaime");
    assert_eq!(vm.state.area_title("99"), "99");
}

#[tokio::test]
async fn failed_fetch_is_an_explicit_state() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, true);
    mock_lists(&http, "tasks");
    http.mock_network_failure(HttpMethod::Get, &url("areas"));

    vm.load().await;

    assert!(vm.state.load.error().is_some());
    assert!(vm.state.tasks.is_empty());
}

// =========================================================
// 筛选
// =========================================================

#[tokio::test]
async fn filters_are_anded() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, true);
    mock_lists(&http, "tasks");
    vm.load().await;

    assert_eq!(vm.state.visible().len(), 3);

    vm.state.filters.search = "BODEGA".into();
    assert_eq!(vm.state.visible()[0].id, "t2");

    vm.state.filters.search.clear();
    vm.state.filters.area = Selection::<String>::from_value("2");
    vm.state.filters.status = Selection::Only(TaskStatus::InProgress);
    let ids: Vec<_> = vm.state.visible().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t3"]);

    vm.state.filters = TaskFilters {
        search: "no existe".into(),
        ..TaskFilters::default()
    };
    assert!(vm.state.visible().is_empty());
}

// =========================================================
// 草稿
// =========================================================

#[tokio::test]
async fn changing_area_clears_foreign_assignee() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, true);
    mock_lists(&http, "tasks");
    vm.load().await;

    assert!(vm.state.open_new());
    vm.state.set_draft_area("2");
    vm.state.set_draft_assignee("u2");
    assert_eq!(vm.state.draft.as_ref().unwrap().assigned_to, "u2");
    assert_eq!(vm.state.candidates().len(), 1);

    vm.state.set_draft_area("3");
    let draft = vm.state.draft.as_ref().unwrap();
    assert_eq!(draft.area_id, "3");
    assert_eq!(draft.assigned_to, "");
    assert_eq!(vm.state.candidates()[0].id, "u3");
}

#[tokio::test]
async fn assignee_outside_area_is_rejected() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, true);
    mock_lists(&http, "tasks");
    vm.load().await;

    vm.state.open_new();
    vm.state.set_draft_area("2");
    vm.state.set_draft_assignee("u3");
    assert_eq!(vm.state.draft.as_ref().unwrap().assigned_to, "");
}

#[tokio::test]
async fn new_draft_is_created_by_current_user() {
    let (_, mut vm) = setup(MANAGER_ROLE_ID, true);
    vm.state.open_new();
    assert_eq!(vm.state.draft.as_ref().unwrap().created_by, "u-me");
}

// =========================================================
// 修改
// =========================================================

#[tokio::test]
async fn save_new_task_posts_dto_and_refetches() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, true);
    mock_lists(&http, "tasks");
    http.mock_response(HttpMethod::Post, &url("tasks"), 201, json!({ "id": "t9" }));
    vm.load().await;

    vm.state.open_new();
    if let Some(draft) = vm.state.draft.as_mut() {
        draft.title = "Conteo".into();
    }
    vm.state.set_draft_area("2");
    vm.state.set_draft_assignee("u2");

    assert!(vm.save().await);
    assert_eq!(vm.state.draft, None);
    assert_eq!(vm.state.notice.as_ref().map(|n| n.is_error), Some(false));

    let requests = http.requests.borrow();
    let (method, _, _, body) = &requests[3];
    assert_eq!(method, "POST");
    let body: Value = serde_json::from_str(body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({
            "title": "Conteo",
            "status": "PENDING",
            "areaId": "2",
            "createdBy": "u-me",
            "assignedTo": "u2"
        })
    );
    assert_eq!(requests[4].1, url("tasks"));
}

#[tokio::test]
async fn invalid_draft_is_not_sent() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, true);
    vm.state.open_new();

    assert!(!vm.save().await);
    assert!(vm.state.draft.is_some());
    assert!(vm.state.notice.as_ref().unwrap().is_error);
    assert!(http.calls().is_empty());
}

#[tokio::test]
async fn failed_update_keeps_draft_open() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, true);
    mock_lists(&http, "tasks");
    http.mock_response(HttpMethod::Put, &url("tasks/t1"), 500, json!({}));
    vm.load().await;

    assert!(vm.state.open_edit("t1"));
    assert!(!vm.save().await);
    assert!(vm.state.draft.is_some());
    assert!(vm.state.notice.as_ref().unwrap().is_error);
}

#[tokio::test]
async fn delete_refetches_instead_of_local_removal() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, true);
    mock_lists(&http, "tasks");
    http.mock_response(HttpMethod::Delete, &url("tasks/t1"), 204, Value::Null);
    vm.load().await;

    assert!(vm.remove("t1").await);

    let calls = http.calls();
    assert_eq!(calls[3], "DELETE http://api.test/tasks/t1");
    assert_eq!(calls[4], "GET http://api.test/tasks");
    // 模拟后端仍返回原列表，说明状态来自重新拉取
    assert_eq!(vm.state.tasks.len(), 3);
}

#[tokio::test]
async fn viewer_cannot_open_or_delete() {
    let (http, mut vm) = setup(VIEWER_ROLE_ID, true);

    assert!(!vm.state.open_new());
    assert!(!vm.remove("t1").await);
    assert!(http.calls().is_empty());
}

// =========================================================
// 按名称解析的角色
// =========================================================

fn mock_roles(http: &MockHttpClient) {
    http.mock_response(
        HttpMethod::Get,
        &url("roles"),
        200,
        json!([{ "id": "r-view", "name": "VIEWER" }, { "id": "r-plan", "name": "PLANILLA" }]),
    );
}

#[tokio::test]
async fn role_named_viewer_cannot_delete_after_load() {
    let (http, mut vm) = setup("r-view", true);
    mock_lists(&http, "tasks");
    mock_roles(&http);
    http.mock_response(HttpMethod::Delete, &url("tasks/t1"), 204, Value::Null);

    vm.load().await;
    assert!(vm.state.access.is_viewer());
    assert!(!vm.state.open_edit("t1"));

    let calls_before = http.calls().len();
    assert!(!vm.remove("t1").await);
    assert_eq!(http.calls().len(), calls_before);
    assert_eq!(vm.state.notice, None);
}

#[tokio::test]
async fn role_named_viewer_is_checked_before_first_load() {
    let (http, mut vm) = setup("r-view", true);
    mock_roles(&http);
    assert!(vm.state.open_new());
    if let Some(draft) = vm.state.draft.as_mut() {
        draft.title = "Conteo".into();
        draft.area_id = "2".into();
    }

    assert!(!vm.save().await);
    assert_eq!(http.calls(), vec!["GET http://api.test/roles"]);
}

#[tokio::test]
async fn role_named_planilla_keeps_mutating() {
    let (http, mut vm) = setup("r-plan", true);
    mock_lists(&http, "tasks");
    mock_roles(&http);
    http.mock_response(HttpMethod::Delete, &url("tasks/t1"), 204, Value::Null);

    vm.load().await;
    assert!(!vm.state.access.is_viewer());
    assert!(vm.remove("t1").await);
    assert!(http.calls().contains(&"DELETE http://api.test/tasks/t1".to_string()));
}

// =========================================================
// 合并异步结果
// =========================================================

#[tokio::test]
async fn load_result_keeps_edits_made_while_in_flight() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, true);
    mock_lists(&http, "tasks");
    let before = vm.state.clone();

    let mut current = before.clone();
    current.filters.search = "bodega".into();
    assert!(current.open_new());

    vm.load().await;
    current.merge(&before, vm.into_state());

    assert_eq!(current.load, LoadState::Ready);
    assert_eq!(current.tasks.len(), 3);
    assert_eq!(current.filters.search, "bodega");
    assert!(current.draft.is_some());
    assert_eq!(current.visible()[0].id, "t2");
}

#[tokio::test]
async fn save_result_closes_draft_but_keeps_filters() {
    let (http, mut vm) = setup(MANAGER_ROLE_ID, true);
    mock_lists(&http, "tasks");
    http.mock_response(HttpMethod::Post, &url("tasks"), 201, json!({ "id": "t9" }));
    vm.load().await;
    vm.state.open_new();
    if let Some(draft) = vm.state.draft.as_mut() {
        draft.title = "Conteo".into();
        draft.area_id = "2".into();
    }
    let before = vm.state.clone();

    let mut current = before.clone();
    current.filters.status = Selection::Only(TaskStatus::Done);

    assert!(vm.save().await);
    current.merge(&before, vm.into_state());

    assert_eq!(current.draft, None);
    assert_eq!(current.notice, Some(Notice::success("Tarea creada")));
    assert_eq!(current.filters.status, Selection::Only(TaskStatus::Done));
}
