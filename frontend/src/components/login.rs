use crate::auth::{login, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;
use taskflow::viewmodels::session::{AuthMode, LoginForm};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let allow_register = !auth.domain().is_main_domain;

    let form = RwSignal::new(LoginForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let is_sign_up = move || form.with(|f| f.mode == AuthMode::SignUp);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let snapshot = form.get_untracked();
        spawn_local(async move {
            if let Err(message) = login(auth, snapshot).await {
                set_error_msg.set(Some(message));
            }
            set_is_submitting.set(false);
        });
    };

    let toggle_mode = move |_| {
        form.update(|f| {
            f.mode = match f.mode {
                AuthMode::SignIn => AuthMode::SignUp,
                AuthMode::SignUp => AuthMode::SignIn,
            };
        });
        set_error_msg.set(None);
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"TaskFlow"</h1>
                    <p class="text-base-content/70">
                        {move || if is_sign_up() { "Crea tu cuenta" } else { "Inicia sesión para continuar" }}
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {move || error_msg.get().map(|message| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{message}</span>
                            </div>
                        })}

                        <Show when=is_sign_up>
                            <div class="form-control">
                                <label class="label" for="name">
                                    <span class="label-text">"Nombre"</span>
                                </label>
                                <input
                                    id="name"
                                    type="text"
                                    class="input input-bordered"
                                    prop:value=move || form.with(|f| f.name.clone())
                                    on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                                />
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                class="input input-bordered"
                                prop:value=move || form.with(|f| f.email.clone())
                                on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Contraseña"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                class="input input-bordered"
                                prop:value=move || form.with(|f| f.password.clone())
                                on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                            />
                        </div>

                        <Show when=is_sign_up>
                            <div class="form-control">
                                <label class="label" for="confirm">
                                    <span class="label-text">"Confirmar contraseña"</span>
                                </label>
                                <input
                                    id="confirm"
                                    type="password"
                                    class="input input-bordered"
                                    prop:value=move || form.with(|f| f.confirm_password.clone())
                                    on:input=move |ev| {
                                        form.update(|f| f.confirm_password = event_target_value(&ev))
                                    }
                                />
                            </div>
                        </Show>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || match (is_submitting.get(), is_sign_up()) {
                                    (true, _) => view! { <span class="loading loading-spinner"></span> }.into_any(),
                                    (false, true) => "Registrarse".into_any(),
                                    (false, false) => "Iniciar sesión".into_any(),
                                }}
                            </button>
                        </div>

                        <Show when=move || allow_register>
                            <button type="button" class="btn btn-link btn-sm" on:click=toggle_mode>
                                {move || if is_sign_up() {
                                    "¿Ya tienes cuenta? Inicia sesión"
                                } else {
                                    "¿No tienes cuenta? Regístrate"
                                }}
                            </button>
                        </Show>
                    </form>
                </div>
            </div>
        </div>
    }
}
