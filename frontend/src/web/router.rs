//! 路由服务
//!
//! 所有对 `window.history` 的操作集中在这里。
//! 导航流程：解析路径 -> 守卫 -> 写入 History -> 更新路由信号。

use leptos::prelude::*;
use taskflow::viewmodels::session::guard;
use taskflow_shared::{AppRoute, Claims};
use wasm_bindgen::prelude::*;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn write_history(path: &str, push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = if push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
    if result.is_err() {
        log::warn!("[Router] History update failed for {}", path);
    }
}

/// 守卫之后真正要显示的路由
fn resolve(target: AppRoute, user: Option<&Claims>) -> AppRoute {
    match guard(target, user) {
        Some(redirect) => {
            log::info!("[Router] {} -> {}", target, redirect);
            redirect
        }
        None => target,
    }
}

/// 路由器服务
///
/// 当前用户通过注入的信号读取，路由本身不关心令牌存在哪里。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    user: Signal<Option<Claims>>,
}

impl RouterService {
    fn new(user: Signal<Option<Claims>>) -> Self {
        let initial = resolve(
            AppRoute::from_path(&current_path()),
            user.get_untracked().as_ref(),
        );
        write_history(initial.to_path(), false);
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            user,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn navigate(&self, route: AppRoute) {
        let user = self.user.get_untracked();
        let route = resolve(route, user.as_ref());
        write_history(route.to_path(), true);
        self.set_route.set(route);
    }

    /// 浏览器后退/前进同样经过守卫
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let user = self.user;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            let route = resolve(target, user.get_untracked().as_ref());
            if route != target {
                write_history(route.to_path(), false);
            }
            set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 监听器与页面同寿命
        closure.forget();
    }

    /// 登录或登出后按守卫重新放置当前路由
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let user = self.user;

        Effect::new(move |_| {
            let user = user.get();
            let route = current_route.get_untracked();
            if let Some(redirect) = guard(route, user.as_ref()) {
                log::info!("[Router] Session changed, redirecting to {}", redirect);
                write_history(redirect.to_path(), true);
                set_route.set(redirect);
            }
        });
    }
}

pub fn use_router() -> Option<RouterService> {
    use_context::<RouterService>()
}

#[component]
pub fn Router(user: Signal<Option<Claims>>, children: Children) -> impl IntoView {
    let router = RouterService::new(user);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    provide_context(router);

    children()
}

/// 根据当前路由渲染对应页面
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();
    move || match router {
        Some(router) => matcher(router.current_route().get()),
        None => matcher(AppRoute::NotFound),
    }
}

/// 站内链接：拦截点击，走路由服务而不是整页跳转
#[component]
pub fn Link(
    route: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        if let Some(router) = router {
            router.navigate(route);
        }
    };

    view! {
        <a href=route.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
