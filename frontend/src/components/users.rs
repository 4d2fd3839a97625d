use crate::auth::{api, use_auth};
use crate::components::common::{
    LoadStatus, NoticeToast, PageHeader, SearchInput, SelectInput, filter_options, spawn_op,
};
use leptos::prelude::*;
use taskflow::viewmodels::Selection;
use taskflow::viewmodels::users::{UserDraft, UsersState, UsersViewModel};

#[component]
pub fn UsersPage() -> impl IntoView {
    let auth = use_auth();
    let state = RwSignal::new(UsersViewModel::new(api(), auth.domain()).into_state());

    let load = move || {
        spawn_op(state, move |snapshot| async move {
            let mut vm = UsersViewModel::with_state(api(), snapshot);
            vm.load().await;
            vm.into_state()
        });
    };
    load();

    let save = move || {
        spawn_op(state, move |snapshot| async move {
            let mut vm = UsersViewModel::with_state(api(), snapshot);
            vm.save().await;
            vm.into_state()
        });
    };

    let remove = move |id: String| {
        spawn_op(state, move |snapshot| async move {
            let mut vm = UsersViewModel::with_state(api(), snapshot);
            vm.remove(&id).await;
            vm.into_state()
        });
    };

    let can_mutate = move || state.with(|s| s.access.can_mutate());
    let role_options = move || {
        state.with(|s| {
            s.roles
                .iter()
                .map(|r| (r.id.clone(), r.name.clone()))
                .collect::<Vec<_>>()
        })
    };
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
            on_dismiss=Callback::new(move |_| state.update(|s| s.notice = None))
        />

        <PageHeader title="Usuarios" subtitle="Miembros del equipo, sus roles y áreas">
            <Show when=can_mutate>
                <button class="btn btn-primary" on:click=move |_| { state.update(|s| { s.open_new(); }); }>
                    "Nuevo usuario"
                </button>
            </Show>
        </PageHeader>

        <div class="flex flex-col md:flex-row gap-2">
            <SearchInput
                placeholder="Buscar por nombre o email"
                value=Signal::derive(move || state.with(|s| s.filters.search.clone()))
                on_input=Callback::new(move |v: String| state.update(|s| s.filters.search = v))
            />
            <SelectInput
                options=Signal::derive(move || filter_options("Todos los roles", role_options()))
                value=Signal::derive(move || state.with(|s| s.filters.role.as_value().to_string()))
                on_change=Callback::new(move |v: String| {
                    state.update(|s| s.filters.role = Selection::<String>::from_value(&v))
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
                            <th>"Nombre"</th>
                            <th>"Email"</th>
                            <th>"Rol"</th>
                            <th class="hidden md:table-cell">"Área"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || state.with(|s| {
                            s.visible()
                                .into_iter()
                                .map(|u| {
                                    let id = u.id.clone();
                                    view! {
                                        <tr>
                                            <td class="font-medium">{u.name.clone()}</td>
                                            <td>{u.email.clone()}</td>
                                            <td>
                                                <span class="badge badge-outline">
                                                    {s.role_name(&u.role_id).to_string()}
                                                </span>
                                            </td>
                                            <td class="hidden md:table-cell">{s.area_title(&u.area_id).to_string()}</td>
                                            <td class="text-right">
                                                <Show when=can_mutate>
                                                    <button
                                                        class="btn btn-ghost btn-xs"
                                                        on:click={
                                                            let id = id.clone();
                                                            move |_| state.update(|s| { s.open_edit(&id); })
                                                        }
                                                    >
                                                        "Editar"
                                                    </button>
                                                    <button
                                                        class="btn btn-ghost btn-xs text-error"
                                                        on:click={
                                                            let id = id.clone();
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
                        })}
                    </tbody>
                </table>
            </div>
        </div>

        <UserDialog state=state on_save=Callback::new(move |_| save()) />
    }
}

/// 编辑用户时密码留空即保持原密码；非管理员不能改区域
#[component]
fn UserDialog(state: RwSignal<UsersState>, on_save: Callback<()>) -> impl IntoView {
    let draft_field = move |pick: fn(&UserDraft) -> String| {
        Signal::derive(move || state.with(|s| s.draft.as_ref().map(pick).unwrap_or_default()))
    };
    let edit_draft = move |apply: fn(&mut UserDraft, String)| {
        move |ev: leptos::ev::Event| {
            let value = event_target_value(&ev);
            state.update(|s| {
                if let Some(d) = s.draft.as_mut() {
                    apply(d, value);
                }
            });
        }
    };
    let is_new = move || state.with(|s| s.draft.as_ref().is_some_and(|d| d.editing.is_none()));

    let role_options = Signal::derive(move || {
        let mut options = vec![(String::new(), "Selecciona un rol".to_string())];
        state.with(|s| options.extend(s.roles.iter().map(|r| (r.id.clone(), r.name.clone()))));
        options
    });
    let area_options = Signal::derive(move || {
        let mut options = vec![(String::new(), "Selecciona un área".to_string())];
        state.with(|s| options.extend(s.areas.iter().map(|a| (a.id.clone(), a.title.clone()))));
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
                        {move || if is_new() { "Nuevo usuario" } else { "Editar usuario" }}
                    </h3>
                    <form class="space-y-3 py-4" on:submit=on_submit>
                        <input
                            type="text"
                            class="input input-bordered w-full"
                            placeholder="Nombre"
                            prop:value=draft_field(|d| d.name.clone())
                            on:input=edit_draft(|d, v| d.name = v)
                        />
                        <input
                            type="email"
                            class="input input-bordered w-full"
                            placeholder="Email"
                            prop:value=draft_field(|d| d.email.clone())
                            on:input=edit_draft(|d, v| d.email = v)
                        />
                        <input
                            type="password"
                            class="input input-bordered w-full"
                            placeholder=move || if is_new() { "Contraseña" } else { "Nueva contraseña (opcional)" }
                            prop:value=draft_field(|d| d.password.clone())
                            on:input=edit_draft(|d, v| d.password = v)
                        />
                        <SelectInput
                            options=role_options
                            value=draft_field(|d| d.role_id.clone())
                            on_change=Callback::new(move |v: String| {
                                state.update(|s| {
                                    if let Some(d) = s.draft.as_mut() {
                                        d.role_id = v;
                                    }
                                })
                            })
                        />
                        <SelectInput
                            options=area_options
                            value=draft_field(|d| d.area_id.clone())
                            disabled=Signal::derive(move || state.with(|s| !s.area_editable()))
                            on_change=Callback::new(move |v: String| state.update(|s| s.set_draft_area(&v)))
                        />
                        <div class="modal-action">
                            <button type="button" class="btn" on:click=move |_| state.update(UsersState::close_draft)>
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
