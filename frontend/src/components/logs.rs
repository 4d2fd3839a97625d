use crate::auth::api;
use crate::components::common::{
    LoadStatus, PageHeader, SearchInput, SelectInput, filter_options, spawn_op,
};
use leptos::prelude::*;
use taskflow::viewmodels::Selection;
use taskflow::viewmodels::logs::{LogsState, LogsViewModel};

#[component]
pub fn LogsPage() -> impl IntoView {
    let state = RwSignal::new(LogsState::default());

    spawn_op(state, move |snapshot| async move {
        let mut vm = LogsViewModel::with_state(api(), snapshot);
        vm.load().await;
        vm.into_state()
    });

    // 区域筛选由后端完成，切换后回到第 1 页
    let set_area = move |value: String| {
        spawn_op(state, move |snapshot| async move {
            let mut vm = LogsViewModel::with_state(api(), snapshot);
            vm.set_area(Selection::<String>::from_value(&value)).await;
            vm.into_state()
        });
    };

    let area_options = move || {
        state.with(|s| {
            s.areas
                .iter()
                .map(|a| (a.id.clone(), a.title.clone()))
                .collect::<Vec<_>>()
        })
    };
    let page = move || state.with(|s| s.pager.page());
    let total_pages = move || state.with(LogsState::total_pages);

    view! {
        <PageHeader title="Logs" subtitle="Registro de actividad del sistema" />

        <div class="flex flex-col md:flex-row gap-2">
            <SearchInput
                placeholder="Buscar por usuario o acción"
                value=Signal::derive(move || state.with(|s| s.search.clone()))
                on_input=Callback::new(move |v: String| state.update(|s| s.set_search(&v)))
            />
            <SelectInput
                options=Signal::derive(move || filter_options("Todas las áreas", area_options()))
                value=Signal::derive(move || state.with(|s| s.area.as_value().to_string()))
                on_change=Callback::new(set_area)
            />
        </div>

        <LoadStatus load=Signal::derive(move || state.with(|s| s.load.clone())) />

        <div class="card bg-base-100 shadow-xl">
            <div class="overflow-x-auto w-full">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>"Fecha"</th>
                            <th>"Usuario"</th>
                            <th>"Acción"</th>
                            <th class="hidden md:table-cell">"Área"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || state.with(|s| {
                            s.page_items()
                                .into_iter()
                                .map(|log| view! {
                                    <tr>
                                        <td class="whitespace-nowrap">{log.timestamp.display()}</td>
                                        <td>{s.user_name(&log.user_id).to_string()}</td>
                                        <td><span class="badge badge-outline">{log.action.as_str().to_string()}</span></td>
                                        <td class="hidden md:table-cell">{s.area_title(&log.area_id).to_string()}</td>
                                    </tr>
                                })
                                .collect_view()
                        })}
                    </tbody>
                </table>
            </div>
            <div class="flex items-center justify-center gap-4 p-4">
                <button
                    class="btn btn-sm"
                    disabled=move || page() <= 1
                    on:click=move |_| { state.update(|s| { s.prev_page(); }); }
                >
                    "Anterior"
                </button>
                <span class="text-sm">"Página " {page} " de " {total_pages}</span>
                <button
                    class="btn btn-sm"
                    disabled=move || page() >= total_pages()
                    on:click=move |_| { state.update(|s| { s.next_page(); }); }
                >
                    "Siguiente"
                </button>
            </div>
        </div>
    }
}
