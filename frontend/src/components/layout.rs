use crate::auth::{logout, use_auth};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

/// 已登录页面的外框：左侧导航 + 内容区
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200 flex font-sans">
            <Sidebar />
            <main class="flex-1 p-4 md:p-8">
                <div class="max-w-7xl mx-auto space-y-6">{children()}</div>
            </main>
        </div>
    }
}

/// 只列出当前角色有权访问的导航项
#[component]
fn Sidebar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let current = move || router.map(|r| r.current_route().get());

    let user_name = move || {
        auth.user
            .with(|u| u.as_ref().map(|c| c.name.clone()).unwrap_or_default())
    };

    let on_logout = move |_| logout(auth);

    view! {
        <aside class="w-64 bg-base-100 shadow-xl flex flex-col">
            <div class="p-6 border-b border-base-200">
                <h2 class="text-2xl font-bold text-primary">"TaskFlow"</h2>
                <p class="text-sm text-base-content/70 truncate">{user_name}</p>
            </div>
            <ul class="menu flex-1 p-4 gap-1">
                {move || {
                    auth.access()
                        .navigation()
                        .into_iter()
                        .map(|route| {
                            let class = if current() == Some(route) { "active" } else { "" };
                            view! {
                                <li>
                                    <Link route=route class=class>{route.title()}</Link>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
            <div class="p-4">
                <button class="btn btn-outline btn-error w-full" on:click=on_logout>
                    "Cerrar sesión"
                </button>
            </div>
        </aside>
    }
}
