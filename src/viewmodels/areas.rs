use super::filter::matches_any;
use super::access::{authorize, settle_access};
use super::{Access, LoadState, Notice, impl_merge_state, report};
use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::request::HttpClient;
use crate::token::TokenStore;
use taskflow_shared::{Area, DomainInfo, PermissionTable, Task, User};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AreaDraft {
    pub editing: Option<String>,
    pub title: String,
    pub description: String,
}

impl AreaDraft {
    pub fn validate(&self) -> ClientResult<()> {
        if self.title.trim().is_empty() {
            return Err(ClientError::invalid_input("El nombre del área es obligatorio"));
        }
        Ok(())
    }

    pub fn to_area(&self) -> Area {
        let description = self.description.trim();
        Area {
            id: self.editing.clone().unwrap_or_default(),
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        }
    }
}

/// 一个区域的成员数与任务数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AreaCounts {
    pub users: usize,
    pub tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AreasState {
    pub load: LoadState,
    pub areas: Vec<Area>,
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
    pub search: String,
    pub draft: Option<AreaDraft>,
    pub notice: Option<Notice>,
    pub domain: DomainInfo,
    pub access: Access,
}

impl AreasState {
    pub fn visible(&self) -> Vec<&Area> {
        self.areas
            .iter()
            .filter(|a| {
                matches_any(
                    &self.search,
                    [a.title.as_str(), a.description.as_deref().unwrap_or("")],
                )
            })
            .collect()
    }

    pub fn counts(&self, area_id: &str) -> AreaCounts {
        AreaCounts {
            users: self.users.iter().filter(|u| u.area_id == area_id).count(),
            tasks: self.tasks.iter().filter(|t| t.area_id == area_id).count(),
        }
    }

    pub fn open_new(&mut self) -> bool {
        if !self.access.can_mutate() {
            return false;
        }
        self.draft = Some(AreaDraft::default());
        true
    }

    pub fn open_edit(&mut self, id: &str) -> bool {
        if !self.access.can_mutate() {
            return false;
        }
        let Some(area) = self.areas.iter().find(|a| a.id == id) else {
            return false;
        };
        self.draft = Some(AreaDraft {
            editing: Some(area.id.clone()),
            title: area.title.clone(),
            description: area.description.clone().unwrap_or_default(),
        });
        true
    }

    pub fn close_draft(&mut self) {
        self.draft = None;
    }
}

impl_merge_state!(AreasState { load, areas, users, tasks, search, draft, notice, domain, access });

pub struct AreasViewModel<C, S> {
    api: ApiClient<C, S>,
    pub state: AreasState,
}

impl<C: HttpClient, S: TokenStore> AreasViewModel<C, S> {
    pub fn new(api: ApiClient<C, S>, domain: DomainInfo) -> Self {
        let state = AreasState {
            domain,
            access: Access::new(api.current_user(), &PermissionTable::default()),
            ..AreasState::default()
        };
        Self::with_state(api, state)
    }

    pub fn with_state(api: ApiClient<C, S>, state: AreasState) -> Self {
        Self { api, state }
    }

    pub fn into_state(self) -> AreasState {
        self.state
    }

    pub async fn load(&mut self) {
        self.state.load = LoadState::Loading;
        settle_access(&mut self.state.access, &self.api).await;
        let areas = self.api.areas();
        let users = self.api.users();
        let tasks = self.api.tasks();
        let result = futures::try_join!(
            areas.list(),
            users.list(),
            tasks.list_for_domain(self.state.domain.is_main_domain)
        );
        match result {
            Ok((areas, users, tasks)) => {
                self.state.areas = areas;
                self.state.users = users;
                self.state.tasks = tasks;
                self.state.load = LoadState::Ready;
            }
            Err(e) => {
                self.state.load = LoadState::Failed(report("Error cargando áreas", &e));
            }
        }
    }

    pub async fn save(&mut self) -> bool {
        if authorize(&mut self.state.access, &self.api).await.is_err() {
            return false;
        }
        let Some(draft) = self.state.draft.clone() else {
            return false;
        };
        if let Err(e) = draft.validate() {
            self.state.notice = Some(Notice::error(e.message()));
            return false;
        }

        let area = draft.to_area();
        let service = self.api.areas();
        let result = match &draft.editing {
            Some(id) => service.update(id, &area).await,
            None => service.create(&area).await,
        };
        if let Err(e) = result {
            self.state.notice = Some(Notice::error(report("Error guardando área", &e)));
            return false;
        }

        self.state.draft = None;
        self.state.notice = Some(Notice::success("Área guardada"));
        self.refresh().await;
        true
    }

    pub async fn remove(&mut self, id: &str) -> bool {
        if authorize(&mut self.state.access, &self.api).await.is_err() {
            return false;
        }
        if let Err(e) = self.api.areas().delete(id).await {
            self.state.notice = Some(Notice::error(report("Error eliminando área", &e)));
            return false;
        }
        self.state.notice = Some(Notice::success("Área eliminada"));
        self.refresh().await;
        true
    }

    async fn refresh(&mut self) {
        match self.api.areas().list().await {
            Ok(areas) => self.state.areas = areas,
            Err(e) => {
                self.state.notice = Some(Notice::error(report("Error recargando áreas", &e)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::token::{MemoryTokenStore, fake_jwt};
    use serde_json::{Value, json};
    use std::rc::Rc;
    use taskflow_shared::permission::ADMIN_ROLE_ID;

    #[tokio::test]
    async fn counts_search_and_delete() {
        let http = Rc::new(MockHttpClient::new());
        let jwt = fake_jwt(json!({ "id": "u-admin", "roleId": ADMIN_ROLE_ID }));
        let api = ApiClient::new(
            http.clone(),
            Rc::new(MemoryTokenStore::with_token(&jwt)),
            ClientConfig::new("http://api.test"),
        );
        http.mock_response(
            HttpMethod::Get,
            "http://api.test/areas",
            200,
            json!([
                { "id": "a1", "title": "Jinotepe", "description": "Sucursal sur" },
                { "id": "a2", "title": "Chontales" }
            ]),
        );
        http.mock_response(
            HttpMethod::Get,
            "http://api.test/users",
            200,
            json!({ "data": [{ "id": "u1", "areaId": "a1" }, { "id": "u2", "areaId": "a1" }] }),
        );
        http.mock_response(
            HttpMethod::Get,
            "http://api.test/tasks",
            200,
            json!([{ "id": "t1", "areaId": "a2" }]),
        );
        http.mock_response(HttpMethod::Delete, "http://api.test/areas/a2", 200, Value::Null);

        let domain = DomainInfo {
            area_id: None,
            is_main_domain: true,
        };
        let mut vm = AreasViewModel::new(api, domain);
        vm.load().await;

        assert_eq!(vm.state.counts("a1"), AreaCounts { users: 2, tasks: 0 });
        assert_eq!(vm.state.counts("a2"), AreaCounts { users: 0, tasks: 1 });

        vm.state.search = "SUR".into();
        assert_eq!(vm.state.visible()[0].id, "a1");

        assert!(vm.remove("a2").await);
        assert_eq!(http.calls().last().unwrap(), "GET http://api.test/areas");
    }
}
