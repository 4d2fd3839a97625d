use crate::auth::{api, use_auth};
use crate::components::common::{
    LoadStatus, NoticeToast, PageHeader, SearchInput, SelectInput, filter_options, spawn_op,
};
use leptos::prelude::*;
use taskflow::viewmodels::Selection;
use taskflow::viewmodels::tasks::{TaskDraft, TasksState, TasksViewModel};
use taskflow_shared::TaskStatus;

fn status_options() -> Vec<(String, String)> {
    TaskStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), s.label().to_string()))
        .collect()
}

fn status_badge(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Done => "badge badge-success",
        TaskStatus::InProgress => "badge badge-info",
        TaskStatus::Rejected => "badge badge-error",
        TaskStatus::PendingValidation => "badge badge-secondary",
        TaskStatus::Pending => "badge badge-warning",
    }
}

#[component]
pub fn TasksPage() -> impl IntoView {
    let auth = use_auth();
    let state = RwSignal::new(TasksViewModel::new(api(), auth.domain()).into_state());

    let load = move || {
        spawn_op(state, move |snapshot| async move {
            let mut vm = TasksViewModel::with_state(api(), snapshot);
            vm.load().await;
            vm.into_state()
        });
    };
    load();

    let save = move || {
        spawn_op(state, move |snapshot| async move {
            let mut vm = TasksViewModel::with_state(api(), snapshot);
            vm.save().await;
            vm.into_state()
        });
    };

    let remove = move |id: String| {
        spawn_op(state, move |snapshot| async move {
            let mut vm = TasksViewModel::with_state(api(), snapshot);
            vm.remove(&id).await;
            vm.into_state()
        });
    };

    let can_mutate = move || state.with(|s| s.access.can_mutate());
    let area_options = move || {
        state.with(|s| {
            s.areas
                .iter()
                .map(|a| (a.id.clone(), a.title.clone()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <NoticeToast
            notice=Signal::derive(move || state.with(|s| s.notice.clone()))
            on_dismiss=Callback::new(move |_| state.update(TasksState::dismiss_notice))
        />

        <PageHeader title="Tareas" subtitle="Gestiona y asigna las tareas de cada área">
            <Show when=can_mutate>
                <button class="btn btn-primary" on:click=move |_| { state.update(|s| { s.open_new(); }); }>
                    "Nueva tarea"
                </button>
            </Show>
        </PageHeader>

        <div class="flex flex-col md:flex-row gap-2">
            <SearchInput
                placeholder="Buscar por título o descripción"
                value=Signal::derive(move || state.with(|s| s.filters.search.clone()))
                on_input=Callback::new(move |v: String| state.update(|s| s.filters.search = v))
            />
            <SelectInput
                options=Signal::derive(move || filter_options("Todos los estados", status_options()))
                value=Signal::derive(move || state.with(|s| s.filters.status.as_value().to_string()))
                on_change=Callback::new(move |v: String| {
                    state.update(|s| s.filters.status = Selection::<TaskStatus>::from_value(&v))
                })
            />
            <SelectInput
                options=Signal::derive(move || filter_options("Todas las áreas", area_options()))
                value=Signal::derive(move || state.with(|s| s.filters.area.as_value().to_string()))
                on_change=Callback::new(move |v: String| {
                    state.update(|s| s.filters.area = Selection::<String>::from_value(&v))
                })
            />
        </div>

        <LoadStatus load=Signal::derive(move || state.with(|s| s.load.clone())) />

        <div class="card bg-base-100 shadow-xl">
            <div class="overflow-x-auto w-full">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>"Título"</th>
                            <th>"Estado"</th>
                            <th>"Asignado a"</th>
                            <th class="hidden md:table-cell">"Área"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || state.with(|s| {
                            let rows = s.visible();
                            if rows.is_empty() && !s.load.is_loading() {
                                return view! {
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "No hay tareas que coincidan con los filtros."
                                        </td>
                                    </tr>
                                }
                                .into_any();
                            }
                            rows.into_iter()
                                .map(|t| {
                                    let edit_id = t.id.clone();
                                    let delete_id = t.id.clone();
                                    view! {
                                        <tr>
                                            <td>
                                                <div class="font-medium">{t.title.clone()}</div>
                                                <div class="text-sm text-base-content/60">
                                                    {t.description.clone().unwrap_or_default()}
                                                </div>
                                            </td>
                                            <td><span class=status_badge(t.status)>{t.status.label()}</span></td>
                                            <td>{s.user_name(&t.assigned_to).to_string()}</td>
                                            <td class="hidden md:table-cell">{s.area_title(&t.area_id).to_string()}</td>
                                            <td class="text-right">
                                                <Show when=can_mutate>
                                                    <button
                                                        class="btn btn-ghost btn-xs"
                                                        on:click={
                                                            let id = edit_id.clone();
                                                            move |_| state.update(|s| { s.open_edit(&id); })
                                                        }
                                                    >
                                                        "Editar"
                                                    </button>
                                                    <button
                                                        class="btn btn-ghost btn-xs text-error"
                                                        on:click={
                                                            let id = delete_id.clone();
                                                            move |_| remove(id.clone())
                                                        }
                                                    >
                                                        "Eliminar"
                                                    </button>
                                                </Show>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        })}
                    </tbody>
                </table>
            </div>
        </div>

        <TaskDialog state=state on_save=Callback::new(move |_| save()) />
    }
}

/// 新建/编辑任务的对话框；区域变化时指派人候选随之刷新
#[component]
fn TaskDialog(state: RwSignal<TasksState>, on_save: Callback<()>) -> impl IntoView {
    let draft_field = move |pick: fn(&TaskDraft) -> String| {
        Signal::derive(move || state.with(|s| s.draft.as_ref().map(pick).unwrap_or_default()))
    };

    let area_options = Signal::derive(move || {
        let mut options = vec![(String::new(), "Selecciona un área".to_string())];
        state.with(|s| options.extend(s.areas.iter().map(|a| (a.id.clone(), a.title.clone()))));
        options
    });
    let candidate_options = Signal::derive(move || {
        let mut options = vec![(String::new(), "Sin asignar".to_string())];
        state.with(|s| {
            options.extend(s.candidates().into_iter().map(|u| (u.id.clone(), u.name.clone())))
        });
        options
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_save.run(());
    };

    view! {
        <Show when=move || state.with(|s| s.draft.is_some())>
            <dialog class="modal modal-open">
                <div class="modal-box">
                    <h3 class="font-bold text-lg">
                        {move || state.with(|s| {
                            if s.draft.as_ref().is_some_and(|d| d.is_new()) { "Nueva tarea" } else { "Editar tarea" }
                        })}
                    </h3>
                    <form class="space-y-3 py-4" on:submit=on_submit>
                        <input
                            type="text"
                            class="input input-bordered w-full"
                            placeholder="Título"
                            prop:value=draft_field(|d| d.title.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                state.update(|s| if let Some(d) = s.draft.as_mut() { d.title = v })
                            }
                        />
                        <textarea
                            class="textarea textarea-bordered w-full"
                            placeholder="Descripción"
                            prop:value=draft_field(|d| d.description.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                state.update(|s| if let Some(d) = s.draft.as_mut() { d.description = v })
                            }
                        ></textarea>
                        <SelectInput
                            options=Signal::derive(status_options)
                            value=draft_field(|d| d.status.as_str().to_string())
                            on_change=Callback::new(move |v: String| {
                                state.update(|s| {
                                    if let (Some(d), Some(status)) = (s.draft.as_mut(), TaskStatus::parse(&v)) {
                                        d.status = status;
                                    }
                                })
                            })
                        />
                        <SelectInput
                            options=area_options
                            value=draft_field(|d| d.area_id.clone())
                            on_change=Callback::new(move |v: String| state.update(|s| s.set_draft_area(&v)))
                        />
                        <SelectInput
                            options=candidate_options
                            value=draft_field(|d| d.assigned_to.clone())
                            on_change=Callback::new(move |v: String| state.update(|s| s.set_draft_assignee(&v)))
                        />
                        <div class="modal-action">
                            <button type="button" class="btn" on:click=move |_| state.update(TasksState::close_draft)>
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
