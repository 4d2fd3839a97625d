use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;
use taskflow::viewmodels::{LoadState, MergeState, Notice};

const NOTICE_MILLIS: u32 = 3_000;

/// 在后台执行一次视图模型操作，结束后把结果合并回页面状态
///
/// 操作拿到的是发起时的快照；操作没有改动、而用户在此期间编辑过的字段
/// （搜索词、筛选、刚打开的对话框）保持用户的值。
pub fn spawn_op<T, Fut>(state: RwSignal<T>, op: impl FnOnce(T) -> Fut)
where
    T: MergeState + Clone + Send + Sync + 'static,
    Fut: Future<Output = T> + 'static,
{
    let before = state.get_untracked();
    let pending = op(before.clone());
    spawn_local(async move {
        let done = pending.await;
        state.update(|s| s.merge(&before, done));
    });
}

/// 右上角的操作结果提示，3 秒后自动关闭
#[component]
pub fn NoticeToast(notice: Signal<Option<Notice>>, on_dismiss: Callback<()>) -> impl IntoView {
    Effect::new(move |_| {
        if notice.with(Option::is_some) {
            Timeout::new(NOTICE_MILLIS, move || on_dismiss.run(())).forget();
        }
    });

    move || {
        notice.get().map(|n| {
            let class = if n.is_error {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{n.message}</span>
                        <button class="btn btn-ghost btn-xs" on:click=move |_| on_dismiss.run(())>
                            "✕"
                        </button>
                    </div>
                </div>
            }
        })
    }
}

/// 加载中显示转圈，失败显示错误
#[component]
pub fn LoadStatus(load: Signal<LoadState>) -> impl IntoView {
    move || match load.get() {
        LoadState::Loading => view! {
            <div class="flex justify-center py-8">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
        LoadState::Failed(message) => view! {
            <div role="alert" class="alert alert-error">
                <span>{message}</span>
            </div>
        }
        .into_any(),
        LoadState::Ready => ().into_any(),
    }
}

/// 页面标题行：标题、说明和右侧的操作按钮
#[component]
pub fn PageHeader(
    title: &'static str,
    subtitle: &'static str,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col md:flex-row md:items-center justify-between gap-4">
            <div>
                <h1 class="text-3xl font-bold">{title}</h1>
                <p class="text-base-content/70">{subtitle}</p>
            </div>
            <div class="flex gap-2">{children.map(|c| c())}</div>
        </div>
    }
}

#[component]
pub fn SearchInput(
    value: Signal<String>,
    on_input: Callback<String>,
    placeholder: &'static str,
) -> impl IntoView {
    view! {
        <input
            type="text"
            class="input input-bordered w-full md:max-w-xs"
            placeholder=placeholder
            prop:value=value
            on:input=move |ev| on_input.run(event_target_value(&ev))
        />
    }
}

/// 下拉选项 `(value, label)`，第一项总是"全部"
pub fn filter_options(
    all_label: &'static str,
    options: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut list = vec![(taskflow_shared::FILTER_ALL.to_string(), all_label.to_string())];
    list.extend(options);
    list
}

#[component]
pub fn SelectInput(
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    value: Signal<String>,
    on_change: Callback<String>,
    #[prop(optional)] disabled: Option<Signal<bool>>,
) -> impl IntoView {
    view! {
        <select
            class="select select-bordered w-full"
            prop:value=value
            disabled=move || disabled.is_some_and(|d| d.get())
            on:change=move |ev| on_change.run(event_target_value(&ev))
        >
            {move || {
                options
                    .get()
                    .into_iter()
                    .map(|(v, label)| {
                        let selected = v == value.get_untracked();
                        view! { <option value=v selected=selected>{label}</option> }
                    })
                    .collect_view()
            }}
        </select>
    }
}

/// 只有名称与描述两个字段的编辑对话框（角色、区域）
#[component]
pub fn NameDescriptionDialog(
    open: Signal<bool>,
    heading: Signal<&'static str>,
    name_placeholder: &'static str,
    name: Signal<String>,
    description: Signal<String>,
    on_name: Callback<String>,
    on_description: Callback<String>,
    on_cancel: Callback<()>,
    on_save: Callback<()>,
) -> impl IntoView {
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_save.run(());
    };

    view! {
        <Show when=move || open.get()>
            <dialog class="modal modal-open">
                <div class="modal-box">
                    <h3 class="font-bold text-lg">{move || heading.get()}</h3>
                    <form class="space-y-3 py-4" on:submit=on_submit>
                        <input
                            type="text"
                            class="input input-bordered w-full"
                            placeholder=name_placeholder
                            prop:value=name
                            on:input=move |ev| on_name.run(event_target_value(&ev))
                        />
                        <textarea
                            class="textarea textarea-bordered w-full"
                            placeholder="Descripción"
                            prop:value=description
                            on:input=move |ev| on_description.run(event_target_value(&ev))
                        ></textarea>
                        <div class="modal-action">
                            <button type="button" class="btn" on:click=move |_| on_cancel.run(())>
                                "Cancelar"
                            </button>
                            <button type="submit" class="btn btn-primary">"Guardar"</button>
                        </div>
                    </form>
                </div>
            </dialog>
        </Show>
    }
}
