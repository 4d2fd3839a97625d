//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性，权限表与前端路由器共用。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    Dashboard,
    Tasks,
    Users,
    Areas,
    Roles,
    Logs,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 侧边栏中的导航项，按显示顺序排列
    pub const NAVIGATION: [AppRoute; 6] = [
        AppRoute::Dashboard,
        AppRoute::Tasks,
        AppRoute::Users,
        AppRoute::Areas,
        AppRoute::Roles,
        AppRoute::Logs,
    ];

    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path {
            "" | "/login" => Self::Login,
            "/dashboard" => Self::Dashboard,
            "/tasks" => Self::Tasks,
            "/users" => Self::Users,
            "/areas" => Self::Areas,
            "/roles" => Self::Roles,
            "/logs" => Self::Logs,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Dashboard => "/dashboard",
            Self::Tasks => "/tasks",
            Self::Users => "/users",
            Self::Areas => "/areas",
            Self::Roles => "/roles",
            Self::Logs => "/logs",
            Self::NotFound => "/404",
        }
    }

    /// 导航栏标题
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Iniciar sesión",
            Self::Dashboard => "Dashboard",
            Self::Tasks => "Tareas",
            Self::Users => "Usuarios",
            Self::Areas => "Áreas",
            Self::Roles => "Roles",
            Self::Logs => "Logs",
            Self::NotFound => "No encontrado",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
