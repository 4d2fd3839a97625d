//! TaskFlow 管理后台前端
//!
//! - `web`: 浏览器适配（fetch、localStorage、History 路由）
//! - `auth`: 会话上下文
//! - `components`: 各个页面，数据与规则都在 `taskflow::viewmodels` 中

mod auth;
mod components {
    pub mod areas;
    pub mod common;
    pub mod dashboard;
    pub mod layout;
    pub mod login;
    pub mod logs;
    pub mod roles;
    pub mod tasks;
    pub mod users;
}

pub(crate) mod web {
    mod http;
    pub mod router;
    mod storage;

    pub use http::BrowserHttpClient;
    pub use storage::{LocalStorageTokenStore, hostname};
}

use crate::auth::AuthContext;
use crate::components::areas::AreasPage;
use crate::components::dashboard::DashboardPage;
use crate::components::layout::Shell;
use crate::components::login::LoginPage;
use crate::components::logs::LogsPage;
use crate::components::roles::RolesPage;
use crate::components::tasks::TasksPage;
use crate::components::users::UsersPage;

use leptos::prelude::*;
use taskflow_shared::AppRoute;
use web::router::{Link, Router, RouterOutlet};

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <Shell><DashboardPage /></Shell> }.into_any(),
        AppRoute::Tasks => view! { <Shell><TasksPage /></Shell> }.into_any(),
        AppRoute::Users => view! { <Shell><UsersPage /></Shell> }.into_any(),
        AppRoute::Areas => view! { <Shell><AreasPage /></Shell> }.into_any(),
        AppRoute::Roles => view! { <Shell><RolesPage /></Shell> }.into_any(),
        AppRoute::Logs => view! { <Shell><LogsPage /></Shell> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Página no encontrada"</p>
                    <Link route=AppRoute::Login class="btn btn-primary">"Volver al inicio"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    view! {
        <Router user=auth_ctx.user_signal()>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
