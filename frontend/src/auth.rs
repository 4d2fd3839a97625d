//! 认证模块
//!
//! 令牌只存在 `localStorage` 里，这里保存的是从令牌解码出的声明、
//! 按角色表解析出的能力，以及启动时由主机名解析出的租户信息。
//! 路由器只读取 `user` 信号。

use crate::web::{BrowserHttpClient, LocalStorageTokenStore, hostname};
use leptos::prelude::*;
use leptos::task::spawn_local;
use taskflow::viewmodels::{Access, resolve_access};
use taskflow::viewmodels::session::{LoginForm, SessionViewModel, login_error_message};
use taskflow::{ApiClient, ClientConfig};
use taskflow_shared::{Claims, DomainInfo, DomainResolver, PermissionTable};

pub type Api = ApiClient<BrowserHttpClient, LocalStorageTokenStore>;

/// 按需构建 API 客户端
///
/// 两个句柄都是无状态的，每次调用都重新读取存储中的令牌。
pub fn api() -> Api {
    let config = ClientConfig::from_env();
    let tokens = LocalStorageTokenStore::new(&config.token_key);
    ApiClient::new(BrowserHttpClient, tokens, config)
}

#[derive(Clone, Copy)]
pub struct AuthContext {
    pub user: RwSignal<Option<Claims>>,
    access: RwSignal<Access>,
    domain: StoredValue<DomainInfo>,
}

impl AuthContext {
    pub fn new() -> Self {
        let domain = DomainResolver::default().resolve(hostname().as_deref());
        log::info!(
            "Resolved domain: area={:?} main={}",
            domain.area_id,
            domain.is_main_domain
        );
        let user = api().current_user();
        let ctx = Self {
            access: RwSignal::new(Access::new(user.clone(), &PermissionTable::default())),
            user: RwSignal::new(user),
            domain: StoredValue::new(domain),
        };
        ctx.refresh_access();
        ctx
    }

    /// 重新解析能力；内置表不认识的角色会按后端角色列表的名称解析
    pub fn refresh_access(&self) {
        let access = self.access;
        spawn_local(async move {
            access.set(resolve_access(&api()).await);
        });
    }

    pub fn domain(&self) -> DomainInfo {
        self.domain.get_value()
    }

    pub fn user_signal(&self) -> Signal<Option<Claims>> {
        self.user.into()
    }

    /// 侧边栏使用的能力，与各页面视图模型使用同一套解析
    pub fn access(&self) -> Access {
        self.access.get()
    }

    pub fn session(&self) -> SessionViewModel<BrowserHttpClient, LocalStorageTokenStore> {
        SessionViewModel::new(api(), self.domain())
    }
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// 提交登录/注册表单
///
/// 成功后刷新 `user` 信号，路由器会据此把用户送到首页。
/// 失败时返回可以直接展示的文本。
pub async fn login(ctx: AuthContext, form: LoginForm) -> Result<(), String> {
    let session = ctx.session();
    match session.submit(&form).await {
        Ok(_) => {
            ctx.user.set(session.current_user());
            ctx.refresh_access();
            Ok(())
        }
        Err(e) => Err(login_error_message(&e)),
    }
}

/// 清除令牌；路由器监听 `user` 变化并跳回登录页
pub fn logout(ctx: AuthContext) {
    ctx.session().sign_out();
    ctx.user.set(None);
    ctx.access.set(Access::default());
}
