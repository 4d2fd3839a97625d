use super::filter::matches_any;
use super::access::authorize;
use super::{Access, LoadState, Notice, impl_merge_state, report};
use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::request::HttpClient;
use crate::token::TokenStore;
use taskflow_shared::{PermissionTable, Role, RoleKind, User};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleDraft {
    pub editing: Option<String>,
    pub name: String,
    pub description: String,
}

impl RoleDraft {
    pub fn validate(&self) -> ClientResult<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::invalid_input("El nombre del rol es obligatorio"));
        }
        Ok(())
    }

    pub fn to_role(&self) -> Role {
        let description = self.description.trim();
        Role {
            id: self.editing.clone().unwrap_or_default(),
            name: self.name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RolesState {
    pub load: LoadState,
    pub roles: Vec<Role>,
    pub users: Vec<User>,
    pub search: String,
    pub draft: Option<RoleDraft>,
    pub notice: Option<Notice>,
    pub access: Access,
}

impl RolesState {
    pub fn visible(&self) -> Vec<&Role> {
        self.roles
            .iter()
            .filter(|r| {
                matches_any(
                    &self.search,
                    [r.name.as_str(), r.description.as_deref().unwrap_or("")],
                )
            })
            .collect()
    }

    pub fn users_with_role(&self, role_id: &str) -> usize {
        self.users.iter().filter(|u| u.role_id == role_id).count()
    }

    /// 按角色名给出能力标签，未识别的角色没有标签
    pub fn capabilities(role: &Role) -> &'static [&'static str] {
        RoleKind::from_name(&role.name)
            .map(|kind| kind.capability_labels())
            .unwrap_or(&[])
    }

    pub fn open_new(&mut self) -> bool {
        if !self.access.can_mutate() {
            return false;
        }
        self.draft = Some(RoleDraft::default());
        true
    }

    pub fn open_edit(&mut self, id: &str) -> bool {
        if !self.access.can_mutate() {
            return false;
        }
        let Some(role) = self.roles.iter().find(|r| r.id == id) else {
            return false;
        };
        self.draft = Some(RoleDraft {
            editing: Some(role.id.clone()),
            name: role.name.clone(),
            description: role.description.clone().unwrap_or_default(),
        });
        true
    }

    pub fn close_draft(&mut self) {
        self.draft = None;
    }
}

impl_merge_state!(RolesState { load, roles, users, search, draft, notice, access });

pub struct RolesViewModel<C, S> {
    api: ApiClient<C, S>,
    pub state: RolesState,
}

impl<C: HttpClient, S: TokenStore> RolesViewModel<C, S> {
    pub fn new(api: ApiClient<C, S>) -> Self {
        let state = RolesState {
            access: Access::new(api.current_user(), &PermissionTable::default()),
            ..RolesState::default()
        };
        Self::with_state(api, state)
    }

    pub fn with_state(api: ApiClient<C, S>, state: RolesState) -> Self {
        Self { api, state }
    }

    pub fn into_state(self) -> RolesState {
        self.state
    }

    pub async fn load(&mut self) {
        self.state.load = LoadState::Loading;
        let roles = self.api.roles();
        let users = self.api.users();
        match futures::try_join!(roles.list(), users.list()) {
            Ok((roles, users)) => {
                self.state.access = self.state.access.clone().with_roles(&roles);
                self.state.roles = roles;
                self.state.users = users;
                self.state.load = LoadState::Ready;
            }
            Err(e) => {
                self.state.load = LoadState::Failed(report("Error cargando roles y usuarios", &e));
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

        let role = draft.to_role();
        let service = self.api.roles();
        let result = match &draft.editing {
            Some(id) => service.update(id, &role).await,
            None => service.create(&role).await,
        };
        if let Err(e) = result {
            self.state.notice = Some(Notice::error(report("Error guardando rol", &e)));
            return false;
        }

        self.state.draft = None;
        self.state.notice = Some(Notice::success("Rol guardado"));
        self.refresh().await;
        true
    }

    pub async fn remove(&mut self, id: &str) -> bool {
        if authorize(&mut self.state.access, &self.api).await.is_err() {
            return false;
        }
        if let Err(e) = self.api.roles().delete(id).await {
            self.state.notice = Some(Notice::error(report("Error eliminando rol", &e)));
            return false;
        }
        self.state.notice = Some(Notice::success("Rol eliminado"));
        self.refresh().await;
        true
    }

    async fn refresh(&mut self) {
        match self.api.roles().list().await {
            Ok(roles) => self.state.roles = roles,
            Err(e) => {
                self.state.notice = Some(Notice::error(report("Error recargando roles", &e)));
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
    use serde_json::json;
    use std::rc::Rc;
    use taskflow_shared::permission::ADMIN_ROLE_ID;

    fn setup() -> (Rc<MockHttpClient>, RolesViewModel<Rc<MockHttpClient>, Rc<MemoryTokenStore>>) {
        let http = Rc::new(MockHttpClient::new());
        let jwt = fake_jwt(json!({ "id": "u-admin", "roleId": ADMIN_ROLE_ID }));
        let api = ApiClient::new(
            http.clone(),
            Rc::new(MemoryTokenStore::with_token(&jwt)),
            ClientConfig::new("http://api.test"),
        );
        http.mock_response(
            HttpMethod::Get,
            "http://api.test/roles",
            200,
            json!([
                { "id": "r1", "name": "ADMIN", "description": "Acceso total" },
                { "id": "r2", "name": "VIEWER" },
                { "id": "r3", "name": "AUDITOR" }
            ]),
        );
        http.mock_response(
            HttpMethod::Get,
            "http://api.test/users",
            200,
            json!({ "data": [{ "id": "u1", "roleId": "r2" }, { "id": "u2", "roleId": "r2" }] }),
        );
        (http, RolesViewModel::new(api))
    }

    #[tokio::test]
    async fn counts_and_capabilities() {
        let (_, mut vm) = setup();
        vm.load().await;

        assert_eq!(vm.state.users_with_role("r2"), 2);
        assert_eq!(vm.state.users_with_role("r1"), 0);
        assert_eq!(RolesState::capabilities(&vm.state.roles[1]), &["Ver Asignadas"]);
        assert!(RolesState::capabilities(&vm.state.roles[2]).is_empty());

        vm.state.search = "total".into();
        assert_eq!(vm.state.visible().len(), 1);
    }

    #[tokio::test]
    async fn save_refetches_roles() {
        let (http, mut vm) = setup();
        http.mock_response(HttpMethod::Post, "http://api.test/roles", 201, json!({ "id": "r4" }));
        vm.load().await;

        vm.state.open_new();
        if let Some(draft) = vm.state.draft.as_mut() {
            draft.name = "MANAGER".into();
        }
        assert!(vm.save().await);
        assert_eq!(
            http.calls()[2..],
            ["POST http://api.test/roles", "GET http://api.test/roles"]
        );
    }

    #[tokio::test]
    async fn failed_delete_surfaces_notice() {
        let (http, mut vm) = setup();
        http.mock_network_failure(HttpMethod::Delete, "http://api.test/roles/r3");
        vm.load().await;

        assert!(!vm.remove("r3").await);
        let notice = vm.state.notice.as_ref().unwrap();
        assert!(notice.is_error);
        assert_eq!(vm.state.roles.len(), 3);
    }
}
