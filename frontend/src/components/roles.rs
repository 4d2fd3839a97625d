use crate::auth::api;
use crate::components::common::{
    LoadStatus, NameDescriptionDialog, NoticeToast, PageHeader, SearchInput, spawn_op,
};
use leptos::prelude::*;
use taskflow::viewmodels::roles::{RoleDraft, RolesState, RolesViewModel};

#[component]
pub fn RolesPage() -> impl IntoView {
    let state = RwSignal::new(RolesViewModel::new(api()).into_state());

    let load = move || {
        spawn_op(state, move |snapshot| async move {
            let mut vm = RolesViewModel::with_state(api(), snapshot);
            vm.load().await;
            vm.into_state()
        });
    };
    load();

    let save = move || {
        spawn_op(state, move |snapshot| async move {
            let mut vm = RolesViewModel::with_state(api(), snapshot);
            vm.save().await;
            vm.into_state()
        });
    };

    let remove = move |id: String| {
        spawn_op(state, move |snapshot| async move {
            let mut vm = RolesViewModel::with_state(api(), snapshot);
            vm.remove(&id).await;
            vm.into_state()
        });
    };

    let can_mutate = move || state.with(|s| s.access.can_mutate());
    let draft_field = move |pick: fn(&RoleDraft) -> String| {
        Signal::derive(move || state.with(|s| s.draft.as_ref().map(pick).unwrap_or_default()))
    };

    view! {
        <NoticeToast
            notice=Signal::derive(move || state.with(|s| s.notice.clone()))
            on_dismiss=Callback::new(move |_| state.update(|s| s.notice = None))
        />

        <PageHeader title="Roles" subtitle="Roles del sistema y lo que cada uno puede hacer">
            <Show when=can_mutate>
                <button class="btn btn-primary" on:click=move |_| { state.update(|s| { s.open_new(); }); }>
                    "Nuevo rol"
                </button>
            </Show>
        </PageHeader>

        <SearchInput
            placeholder="Buscar rol"
            value=Signal::derive(move || state.with(|s| s.search.clone()))
            on_input=Callback::new(move |v: String| state.update(|s| s.search = v))
        />

        <LoadStatus load=Signal::derive(move || state.with(|s| s.load.clone())) />

        <div class="grid gap-4 md:grid-cols-2 lg:grid-cols-3">
            {move || state.with(|s| {
                s.visible()
                    .into_iter()
                    .map(|role| {
                        let id = role.id.clone();
                        let members = s.users_with_role(&role.id);
                        let capabilities = RolesState::capabilities(role);
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body">
                                    <div class="flex items-center justify-between">
                                        <h3 class="card-title">{role.name.clone()}</h3>
                                        <span class="badge badge-neutral">{members} " usuarios"</span>
                                    </div>
                                    <p class="text-base-content/70">{role.description.clone().unwrap_or_default()}</p>
                                    <ul class="list-disc list-inside text-sm">
                                        {capabilities.iter().map(|c| view! { <li>{*c}</li> }).collect_view()}
                                    </ul>
                                    <Show when=can_mutate>
                                        <div class="card-actions justify-end">
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
                                        </div>
                                    </Show>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()
            })}
        </div>

        <NameDescriptionDialog
            open=Signal::derive(move || state.with(|s| s.draft.is_some()))
            heading=Signal::derive(move || state.with(|s| {
                if s.draft.as_ref().is_some_and(|d| d.editing.is_some()) { "Editar rol" } else { "Nuevo rol" }
            }))
            name_placeholder="Nombre del rol"
            name=draft_field(|d| d.name.clone())
            description=draft_field(|d| d.description.clone())
            on_name=Callback::new(move |v: String| {
                state.update(|s| if let Some(d) = s.draft.as_mut() { d.name = v })
            })
            on_description=Callback::new(move |v: String| {
                state.update(|s| if let Some(d) = s.draft.as_mut() { d.description = v })
            })
            on_cancel=Callback::new(move |_| state.update(RolesState::close_draft))
            on_save=Callback::new(move |_| save())
        />
    }
}
