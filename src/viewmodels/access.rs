use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::request::HttpClient;
use crate::token::TokenStore;
use std::collections::BTreeSet;
use taskflow_shared::{AppRoute, Claims, PermissionTable, Role, RoleKind};

/// 当前用户在界面上的能力
///
/// 由令牌声明推导，只决定菜单与按钮是否可用，后端仍然会校验每一个请求。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Access {
    user: Option<Claims>,
    kind: Option<RoleKind>,
    /// 已经用后端角色列表补充解析过
    roles_checked: bool,
}

impl Access {
    pub fn new(user: Option<Claims>, table: &PermissionTable) -> Self {
        let kind = user.as_ref().and_then(|c| table.kind_of(&c.role_id));
        Self {
            user,
            kind,
            roles_checked: false,
        }
    }

    /// 用已加载的角色列表补充解析
    pub fn with_roles(self, roles: &[Role]) -> Self {
        let table = PermissionTable::default().with_roles(roles);
        Self {
            roles_checked: true,
            ..Self::new(self.user, &table)
        }
    }

    /// 内置表不认识这个角色 ID，且还没有查过角色列表
    pub fn needs_role_list(&self) -> bool {
        self.user.is_some() && self.kind.is_none() && !self.roles_checked
    }

    pub fn user(&self) -> Option<&Claims> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> &str {
        self.user.as_ref().map_or("", |c| c.id.as_str())
    }

    pub fn kind(&self) -> Option<RoleKind> {
        self.kind
    }

    pub fn is_admin(&self) -> bool {
        self.kind.is_some_and(|k| k.spans_all_areas())
    }

    pub fn is_viewer(&self) -> bool {
        self.kind == Some(RoleKind::Viewer)
    }

    /// 未登录或只读角色不能修改任何实体；未识别的角色按普通用户处理
    pub fn can_mutate(&self) -> bool {
        self.user.is_some() && self.kind.is_none_or(|k| k.can_mutate())
    }

    /// 修改之前的检查，不通过时不应发出任何请求
    pub fn require_mutation(&self) -> ClientResult<()> {
        if self.user.is_none() {
            return Err(ClientError::unauthenticated());
        }
        if !self.can_mutate() {
            return Err(ClientError::forbidden("Tu rol no permite modificar datos"));
        }
        Ok(())
    }

    /// 非管理员的区域选择被锁定在自己的区域
    pub fn locked_area(&self) -> Option<&str> {
        match &self.user {
            Some(claims) if !self.is_admin() => Some(claims.area_id.as_str()),
            _ => None,
        }
    }

    pub fn routes(&self) -> BTreeSet<AppRoute> {
        self.kind.map(|k| k.routes()).unwrap_or_default()
    }

    /// 侧边栏按固定顺序排列的可见项
    pub fn navigation(&self) -> Vec<AppRoute> {
        let routes = self.routes();
        AppRoute::NAVIGATION
            .into_iter()
            .filter(|r| routes.contains(r))
            .collect()
    }
}

/// 解析当前令牌对应的能力
///
/// 先查内置表；不认识的角色 ID 再拉取角色列表按名称解析。
/// 角色列表拉取失败时沿用内置表的结果，下次再试。
pub async fn resolve_access<C: HttpClient, S: TokenStore>(api: &ApiClient<C, S>) -> Access {
    let access = Access::new(api.current_user(), &PermissionTable::default());
    if !access.needs_role_list() {
        return access;
    }
    match api.roles().list().await {
        Ok(roles) => access.with_roles(&roles),
        Err(e) => {
            log::warn!("Could not resolve role by name: {}", e);
            access
        }
    }
}

/// 角色尚未按名称解析时补上
pub(crate) async fn settle_access<C: HttpClient, S: TokenStore>(
    access: &mut Access,
    api: &ApiClient<C, S>,
) {
    if access.needs_role_list() {
        *access = resolve_access(api).await;
    }
}

/// 修改前补全角色解析再做检查
///
/// 页面还没加载完就触发的修改也按同一张角色表判断。
pub(crate) async fn authorize<C: HttpClient, S: TokenStore>(
    access: &mut Access,
    api: &ApiClient<C, S>,
) -> ClientResult<()> {
    settle_access(access, api).await;
    access.require_mutation().inspect_err(|e| {
        log::debug!("Mutation skipped: {}", e);
    })
}
