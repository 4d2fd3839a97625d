//! 用户页面
//!
//! 只读角色的所有修改入口都是空操作，不发请求、不改状态；
//! 非管理员的区域选择被锁定在自己的区域。

use super::filter::{Selection, matches_any};
use super::access::authorize;
use super::{Access, LoadState, Notice, impl_merge_state, label_or_id, report};
use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::request::HttpClient;
use crate::token::TokenStore;
use taskflow_shared::{Area, DomainInfo, PermissionTable, Role, User};


#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilters {
    pub search: String,
    pub role: Selection<String>,
    pub area: Selection<String>,
}

impl UserFilters {
    pub fn matches(&self, user: &User) -> bool {
        matches_any(&self.search, [user.name.as_str(), user.email.as_str()])
            && self.role.matches_str(&user.role_id)
            && self.area.matches_str(&user.area_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserDraft {
    pub editing: Option<String>,
    pub name: String,
    pub email: String,
    /// 留空表示不修改密码
    pub password: String,
    pub role_id: String,
    pub area_id: String,
}

impl UserDraft {
    pub fn validate(&self) -> ClientResult<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ClientError::invalid_input("Nombre y email son obligatorios"));
        }
        if self.role_id.is_empty() || self.area_id.is_empty() {
            return Err(ClientError::invalid_input("Selecciona un rol y un área"));
        }
        if self.editing.is_none() && self.password.len() < 6 {
            return Err(ClientError::invalid_input(
                "La contraseña debe tener al menos 6 caracteres.",
            ));
        }
        Ok(())
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.editing.clone().unwrap_or_default(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            area_id: self.area_id.clone(),
            role_id: self.role_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UsersState {
    pub load: LoadState,
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub areas: Vec<Area>,
    pub filters: UserFilters,
    pub draft: Option<UserDraft>,
    pub notice: Option<Notice>,
    pub domain: DomainInfo,
    pub access: Access,
}

impl UsersState {
    pub fn new(domain: DomainInfo, access: Access) -> Self {
        Self {
            domain,
            access,
            ..Self::default()
        }
    }

    pub fn visible(&self) -> Vec<&User> {
        self.users
            .iter()
            .filter(|u| self.filters.matches(u))
            .collect()
    }

    pub fn role_name<'a>(&'a self, id: &'a str) -> &'a str {
        label_or_id(&self.roles, id, |r| r.id.as_str(), |r| r.name.as_str())
    }

    pub fn area_title<'a>(&'a self, id: &'a str) -> &'a str {
        label_or_id(&self.areas, id, |a| a.id.as_str(), |a| a.title.as_str())
    }

    /// 区域下拉框是否可选
    pub fn area_editable(&self) -> bool {
        self.access.locked_area().is_none()
    }

    pub fn open_new(&mut self) -> bool {
        if !self.access.can_mutate() {
            return false;
        }
        self.draft = Some(UserDraft {
            area_id: self.access.locked_area().unwrap_or("").to_string(),
            ..UserDraft::default()
        });
        true
    }

    /// 编辑时不回填密码
    pub fn open_edit(&mut self, id: &str) -> bool {
        if !self.access.can_mutate() {
            return false;
        }
        let Some(user) = self.users.iter().find(|u| u.id == id) else {
            return false;
        };
        let area_id = self
            .access
            .locked_area()
            .unwrap_or(user.area_id.as_str())
            .to_string();
        self.draft = Some(UserDraft {
            editing: Some(user.id.clone()),
            name: user.name.clone(),
            email: user.email.clone(),
            password: String::new(),
            role_id: user.role_id.clone(),
            area_id,
        });
        true
    }

    pub fn set_draft_area(&mut self, area_id: &str) {
        if !self.area_editable() {
            return;
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.area_id = area_id.to_string();
        }
    }

    pub fn close_draft(&mut self) {
        self.draft = None;
    }
}

impl_merge_state!(UsersState { load, users, roles, areas, filters, draft, notice, domain, access });

pub struct UsersViewModel<C, S> {
    api: ApiClient<C, S>,
    pub state: UsersState,
}

impl<C: HttpClient, S: TokenStore> UsersViewModel<C, S> {
    pub fn new(api: ApiClient<C, S>, domain: DomainInfo) -> Self {
        let access = Access::new(api.current_user(), &PermissionTable::default());
        Self::with_state(api, UsersState::new(domain, access))
    }

    pub fn with_state(api: ApiClient<C, S>, state: UsersState) -> Self {
        Self { api, state }
    }

    pub fn into_state(self) -> UsersState {
        self.state
    }

    /// 租户子域名只保留调用者所在区域的用户
    async fn fetch_users(&self) -> ClientResult<Vec<User>> {
        let users = self.api.users().list().await?;
        if self.state.domain.is_main_domain {
            return Ok(users);
        }
        let area = self.state.access.user().map(|c| c.area_id.clone());
        Ok(match area {
            Some(area) => users.into_iter().filter(|u| u.area_id == area).collect(),
            None => users,
        })
    }

    pub async fn load(&mut self) {
        self.state.load = LoadState::Loading;
        let roles = self.api.roles();
        let areas = self.api.areas();
        match futures::try_join!(self.fetch_users(), roles.list(), areas.list()) {
            Ok((users, roles, areas)) => {
                self.state.access = self.state.access.clone().with_roles(&roles);
                self.state.users = users;
                self.state.roles = roles;
                self.state.areas = areas;
                self.state.load = LoadState::Ready;
            }
            Err(e) => {
                self.state.load = LoadState::Failed(report("Error cargando usuarios", &e));
            }
        }
    }

    pub async fn save(&mut self) -> bool {
        if authorize(&mut self.state.access, &self.api).await.is_err() {
            return false;
        }
        let Some(mut draft) = self.state.draft.clone() else {
            return false;
        };
        if let Some(area) = self.state.access.locked_area() {
            draft.area_id = area.to_string();
        }
        if let Err(e) = draft.validate() {
            self.state.notice = Some(Notice::error(e.message()));
            return false;
        }

        let user = draft.to_user();
        let service = self.api.users();
        let result = match &draft.editing {
            Some(id) => service.update(id, &user).await,
            None => service.create(&user).await,
        };
        if let Err(e) = result {
            self.state.notice = Some(Notice::error(report("Error guardando usuario", &e)));
            return false;
        }

        self.state.draft = None;
        self.state.notice = Some(Notice::success("Usuario guardado"));
        self.refresh().await;
        true
    }

    pub async fn remove(&mut self, id: &str) -> bool {
        if authorize(&mut self.state.access, &self.api).await.is_err() {
            return false;
        }
        if let Err(e) = self.api.users().delete(id).await {
            self.state.notice = Some(Notice::error(report("Error eliminando usuario", &e)));
            return false;
        }
        self.state.notice = Some(Notice::success("Usuario eliminado"));
        self.refresh().await;
        true
    }

    async fn refresh(&mut self) {
        match self.fetch_users().await {
            Ok(users) => self.state.users = users,
            Err(e) => {
                self.state.notice = Some(Notice::error(report("Error recargando usuarios", &e)));
            }
        }
    }
}
