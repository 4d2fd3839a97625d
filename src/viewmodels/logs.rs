//! 审计日志页面
//!
//! 区域筛选变化时重新向后端请求（全部或按区域），并回到第 1 页；
//! 文本搜索在本地进行，匹配用户名、原始用户 ID 或动作名。

use super::filter::{Selection, contains_ci};
use super::pagination::Paginator;
use super::{LoadState, impl_merge_state, label_or_id, report};
use crate::api::ApiClient;
use crate::request::HttpClient;
use crate::token::TokenStore;
use taskflow_shared::{Area, LogEntry, User};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogsState {
    pub load: LoadState,
    pub logs: Vec<LogEntry>,
    pub users: Vec<User>,
    pub areas: Vec<Area>,
    pub search: String,
    pub area: Selection<String>,
    pub pager: Paginator,
}

impl LogsState {
    pub fn user_name<'a>(&'a self, id: &'a str) -> &'a str {
        label_or_id(&self.users, id, |u| u.id.as_str(), |u| u.name.as_str())
    }

    pub fn area_title<'a>(&'a self, id: &'a str) -> &'a str {
        label_or_id(&self.areas, id, |a| a.id.as_str(), |a| a.title.as_str())
    }

    pub fn filtered(&self) -> Vec<&LogEntry> {
        self.logs
            .iter()
            .filter(|log| {
                contains_ci(&log.user_id, &self.search)
                    || contains_ci(self.user_name(&log.user_id), &self.search)
                    || contains_ci(log.action.as_str(), &self.search)
            })
            .collect()
    }

    /// 当前页的条目
    pub fn page_items(&self) -> Vec<&LogEntry> {
        let filtered = self.filtered();
        self.pager.slice(&filtered).to_vec()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered().len())
    }

    pub fn next_page(&mut self) -> bool {
        let len = self.filtered().len();
        self.pager.next(len)
    }

    pub fn prev_page(&mut self) -> bool {
        self.pager.prev()
    }

    /// 搜索词变化后页码可能越界
    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_string();
        let len = self.filtered().len();
        self.pager.clamp(len);
    }
}

impl_merge_state!(LogsState { load, logs, users, areas, search, area, pager });

pub struct LogsViewModel<C, S> {
    api: ApiClient<C, S>,
    pub state: LogsState,
}

impl<C: HttpClient, S: TokenStore> LogsViewModel<C, S> {
    pub fn new(api: ApiClient<C, S>) -> Self {
        Self::with_state(api, LogsState::default())
    }

    pub fn with_state(api: ApiClient<C, S>, state: LogsState) -> Self {
        Self { api, state }
    }

    pub fn into_state(self) -> LogsState {
        self.state
    }

    /// 查找表（区域、用户）与日志列表
    pub async fn load(&mut self) {
        self.state.load = LoadState::Loading;
        let areas = self.api.areas();
        let users = self.api.users();
        match futures::try_join!(areas.list(), users.list()) {
            Ok((areas, users)) => {
                self.state.areas = areas;
                self.state.users = users;
            }
            // 查找表失败不影响日志本身，名称回落为 ID
            Err(e) => {
                report("Error cargando áreas o usuarios", &e);
            }
        }
        self.load_logs().await;
    }

    pub async fn set_area(&mut self, area: Selection<String>) {
        self.state.area = area;
        self.load_logs().await;
    }

    async fn load_logs(&mut self) {
        let service = self.api.logs();
        let result = match &self.state.area {
            Selection::All => service.list_all().await,
            Selection::Only(area_id) => service.list_by_area(area_id).await,
        };
        match result {
            Ok(logs) => {
                self.state.logs = logs;
                self.state.pager.reset();
                self.state.load = LoadState::Ready;
            }
            Err(e) => {
                self.state.load = LoadState::Failed(report("Error cargando logs", &e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::token::MemoryTokenStore;
    use serde_json::{Value, json};
    use std::rc::Rc;

    fn log_items(n: usize) -> Value {
        let items: Vec<Value> = (0..n)
            .map(|i| {
                json!({
                    "id": format!("l{}", i),
                    "userId": if i % 2 == 0 { "u1" } else { "u2" },
                    "action": if i == 0 { "DELETE_TASK" } else { "LOGIN" },
                    "areaId": "a1",
                    "timestamp": format!("2024-01-{:02}T00:00:00Z", i + 1)
                })
            })
            .collect();
        json!({ "data": items })
    }

    fn setup() -> (Rc<MockHttpClient>, LogsViewModel<Rc<MockHttpClient>, Rc<MemoryTokenStore>>) {
        let http = Rc::new(MockHttpClient::new());
        let api = ApiClient::new(
            http.clone(),
            Rc::new(MemoryTokenStore::with_token("t")),
            ClientConfig::new("http://api.test"),
        );
        http.mock_response(HttpMethod::Get, "http://api.test/logs", 200, log_items(12));
        http.mock_response(HttpMethod::Get, "http://api.test/logs/area/a1", 200, log_items(3));
        http.mock_response(
            HttpMethod::Get,
            "http://api.test/users",
            200,
            json!({ "data": [{ "id": "u1", "name": "Ana" }] }),
        );
        http.mock_response(HttpMethod::Get, "http://api.test/areas", 200, json!([]));
        (http, LogsViewModel::new(api))
    }

    #[tokio::test]
    async fn twelve_logs_paginate_into_ten_and_two() {
        let (_, mut vm) = setup();
        vm.load().await;

        assert_eq!(vm.state.total_pages(), 2);
        assert_eq!(vm.state.page_items().len(), 10);
        // 最新的在前
        assert_eq!(vm.state.page_items()[0].id, "l11");

        assert!(vm.state.next_page());
        assert_eq!(vm.state.page_items().len(), 2);

        assert!(!vm.state.next_page());
        assert_eq!(vm.state.pager.page(), 2);
        assert_eq!(vm.state.page_items().len(), 2);
    }

    #[tokio::test]
    async fn area_change_reloads_and_resets_page() {
        let (http, mut vm) = setup();
        vm.load().await;
        vm.state.next_page();

        vm.set_area(Selection::<String>::from_value("a1")).await;

        assert_eq!(vm.state.pager.page(), 1);
        assert_eq!(vm.state.logs.len(), 3);
        assert_eq!(http.calls().last().unwrap(), "GET http://api.test/logs/area/a1");
    }

    #[tokio::test]
    async fn search_by_user_name_or_action() {
        let (_, mut vm) = setup();
        vm.load().await;
        vm.state.next_page();

        vm.state.set_search("ana");
        assert_eq!(vm.state.filtered().len(), 6);
        assert_eq!(vm.state.pager.page(), 1);

        vm.state.set_search("delete_");
        assert_eq!(vm.state.filtered().len(), 1);

        assert_eq!(vm.state.user_name("u2"), "u2");
    }

    #[tokio::test]
    async fn failed_lookup_still_loads_logs() {
        let (http, mut vm) = setup();
        http.mock_network_failure(HttpMethod::Get, "http://api.test/users");
        vm.load().await;

        assert_eq!(vm.state.load, LoadState::Ready);
        assert_eq!(vm.state.logs.len(), 12);
    }
}
