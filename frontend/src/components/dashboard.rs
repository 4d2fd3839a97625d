use crate::auth::{api, use_auth};
use crate::components::common::{LoadStatus, PageHeader, spawn_op};
use leptos::prelude::*;
use taskflow::viewmodels::dashboard::{DashboardState, DashboardViewModel};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let state = RwSignal::new(DashboardState::default());

    let load = move || {
        let domain = auth.domain();
        spawn_op(state, move |_| async move {
            let mut vm = DashboardViewModel::new(api(), domain);
            vm.load().await;
            vm.into_state()
        });
    };
    load();

    let stat = move |pick: fn(&DashboardState) -> usize| move || state.with(|s| pick(s));

    view! {
        <PageHeader title="Dashboard" subtitle="Resumen de las tareas de tu área">
            <button class="btn btn-ghost" on:click=move |_| load()>"Actualizar"</button>
        </PageHeader>

        <LoadStatus load=Signal::derive(move || state.with(|s| s.load.clone())) />

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Total de tareas"</div>
                <div class="stat-value text-primary">{stat(|s| s.stats().total)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Completadas"</div>
                <div class="stat-value text-success">{stat(|s| s.stats().done)}</div>
                <div class="stat-desc">
                    {move || state.with(|s| s.stats().completion_rate)} "% de avance"
                </div>
            </div>
            <div class="stat">
                <div class="stat-title">"En progreso"</div>
                <div class="stat-value text-info">{stat(|s| s.stats().in_progress)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Pendientes"</div>
                <div class="stat-value text-warning">{stat(|s| s.stats().pending)}</div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"Tareas recientes"</h3>
                <div class="overflow-x-auto">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Título"</th>
                                <th>"Estado"</th>
                                <th>"Asignado a"</th>
                                <th class="hidden md:table-cell">"Área"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || state.with(|s| {
                                s.recent()
                                    .into_iter()
                                    .map(|t| view! {
                                        <tr>
                                            <td class="font-medium">{t.title.to_string()}</td>
                                            <td><span class="badge badge-outline">{t.status.label()}</span></td>
                                            <td>{t.assignee.to_string()}</td>
                                            <td class="hidden md:table-cell">{t.area.to_string()}</td>
                                        </tr>
                                    })
                                    .collect_view()
                            })}
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
