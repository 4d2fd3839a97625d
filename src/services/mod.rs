//! 实体服务
//!
//! 每个实体一个服务，包装 [`ApiClient`] 的路径约定与模型映射。
//! 服务只借用客户端，随用随建。

mod audit;
mod auth;
mod task;
mod user;

#[cfg(test)]
mod tests;

pub use auth::{AuthService, Credentials, Registration};
pub use audit::{LogService, SYSTEM_USER_ID, SYSTEM_USER_LABEL};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::request::HttpClient;
use crate::token::TokenStore;
use std::marker::PhantomData;
use taskflow_shared::{Area, Resource, Role, Task, User};

/// 单一实体的 CRUD 服务
pub struct EntityService<'a, C, S, M> {
    api: &'a ApiClient<C, S>,
    _model: PhantomData<M>,
}

pub type TaskService<'a, C, S> = EntityService<'a, C, S, Task>;
pub type UserService<'a, C, S> = EntityService<'a, C, S, User>;
pub type RoleService<'a, C, S> = EntityService<'a, C, S, Role>;
pub type AreaService<'a, C, S> = EntityService<'a, C, S, Area>;

impl<'a, C: HttpClient, S: TokenStore, M: Resource> EntityService<'a, C, S, M> {
    pub fn new(api: &'a ApiClient<C, S>) -> Self {
        Self {
            api,
            _model: PhantomData,
        }
    }

    pub async fn list(&self) -> ClientResult<Vec<M>> {
        self.api
            .list::<M>()
            .await
            .map_err(|e| e.in_op(format!("{}.list", M::PATH)))
    }

    pub async fn get_by_id(&self, id: &str) -> ClientResult<Option<M>> {
        self.api
            .get_by_id::<M>(id)
            .await
            .map_err(|e| e.in_op_with(format!("{}.get_by_id", M::PATH), id))
    }

    pub async fn create(&self, model: &M) -> ClientResult<Option<M>> {
        self.api
            .create(model)
            .await
            .map_err(|e| e.in_op(format!("{}.create", M::PATH)))
    }

    pub async fn update(&self, id: &str, model: &M) -> ClientResult<Option<M>> {
        self.api
            .update(id, model)
            .await
            .map_err(|e| e.in_op_with(format!("{}.update", M::PATH), id))
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.api
            .remove::<M>(id)
            .await
            .map_err(|e| e.in_op_with(format!("{}.delete", M::PATH), id))
    }
}

impl<C: HttpClient, S: TokenStore> ApiClient<C, S> {
    pub fn tasks(&self) -> TaskService<'_, C, S> {
        EntityService::new(self)
    }

    pub fn users(&self) -> UserService<'_, C, S> {
        EntityService::new(self)
    }

    pub fn roles(&self) -> RoleService<'_, C, S> {
        EntityService::new(self)
    }

    pub fn areas(&self) -> AreaService<'_, C, S> {
        EntityService::new(self)
    }

    pub fn logs(&self) -> LogService<'_, C, S> {
        LogService::new(self)
    }

    pub fn auth(&self) -> AuthService<'_, C, S> {
        AuthService::new(self)
    }
}
