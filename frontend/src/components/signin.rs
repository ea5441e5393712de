use crate::api;
use crate::auth::{login, use_auth};
use crate::components::icons::HardHat;
use crate::web::route::landing_for_role;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn SignInPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let auth_state = auth_ctx.state;
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (show_password, set_show_password) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let is_loading = move || auth_state.get().is_loading;

    view! {
        <Show when=move || !is_loading() fallback=|| view! { <div class="flex items-center justify-center min-h-screen"><span class="loading loading-spinner loading-lg text-primary"></span></div> }>
            {
                let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
                    ev.prevent_default();
                    if email.get().is_empty() || password.get().is_empty() {
                        set_error_msg.set(Some("Please fill in all fields".to_string()));
                        return;
                    }

                    set_is_submitting.set(true);
                    set_error_msg.set(None);

                    spawn_local(async move {
                        match api::login(email.get_untracked(), password.get_untracked()).await {
                            Ok(resp) => match login(&auth_ctx, resp.access_token) {
                                Ok(session) => {
                                    // 按角色分流落地页
                                    router.navigate(&landing_for_role(session.role).to_path());
                                }
                                Err(err) => {
                                    set_error_msg.set(Some(format!(
                                        "Sign-in succeeded but the token was unusable ({})",
                                        err
                                    )));
                                }
                            },
                            Err(msg) => {
                                set_error_msg.set(Some(msg));
                            }
                        }
                        set_is_submitting.set(false);
                    });
                };

                view! {
                    <div class="hero min-h-screen bg-base-200">
                        <div class="hero-content flex-col w-full max-w-md">
                            <div class="text-center mb-4">
                                <div class="flex flex-col items-center gap-2">
                                    <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                                        <HardHat attr:class="h-8 w-8" />
                                    </div>
                                    <h1 class="text-3xl font-bold">"SiteTrack"</h1>
                                    <p class="text-base-content/70">
                                        "Enter your email and password to sign in"
                                    </p>
                                </div>
                            </div>

                            <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                                <form class="card-body" on:submit=on_submit>
                                    <Show when=move || error_msg.get().is_some()>
                                        <div role="alert" class="alert alert-error text-sm py-2">
                                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                                        </div>
                                    </Show>

                                    <div class="form-control">
                                        <label class="label" for="email">
                                            <span class="label-text">"Email"</span>
                                        </label>
                                        <input
                                            id="email"
                                            type="email"
                                            placeholder="info@site.example"
                                            on:input=move |ev| set_email.set(event_target_value(&ev))
                                            prop:value=email
                                            class="input input-bordered"
                                            required
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label" for="password">
                                            <span class="label-text">"Password"</span>
                                        </label>
                                        <div class="join w-full">
                                            <input
                                                id="password"
                                                type=move || if show_password.get() { "text" } else { "password" }
                                                placeholder="••••••••"
                                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                                prop:value=password
                                                class="input input-bordered join-item w-full"
                                                required
                                            />
                                            <button
                                                type="button"
                                                class="btn join-item"
                                                on:click=move |_| set_show_password.update(|v| *v = !*v)
                                            >
                                                {move || if show_password.get() { "Hide" } else { "Show" }}
                                            </button>
                                        </div>
                                    </div>
                                    <div class="form-control mt-6">
                                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                            {move || if is_submitting.get() {
                                                view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                            } else {
                                                "Sign in".into_any()
                                            }}
                                        </button>
                                    </div>
                                </form>
                            </div>
                        </div>
                    </div>
                }
            }
        </Show>
    }
}
