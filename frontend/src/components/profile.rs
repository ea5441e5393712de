use crate::auth::use_auth;
use crate::components::shell::role_badge_class;
use leptos::prelude::*;

/// 个人资料页：展示当前会话的身份信息
///
/// 信息全部来自客户端解码的 Token 声明，仅作展示。
#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth_ctx = use_auth();
    let auth_state = auth_ctx.state;

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <h1 class="text-2xl font-bold">"个人资料"</h1>

            {move || {
                let state = auth_state.get();
                match state.session {
                    None => view! {
                        <div class="flex justify-center py-12">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                    .into_any(),
                    Some(session) => {
                        let email = session.email.clone().unwrap_or_else(|| session.user_id.clone());
                        let initial = email
                            .chars()
                            .next()
                            .map(|c| c.to_uppercase().to_string())
                            .unwrap_or_else(|| "U".to_string());
                        view! {
                            <div class="card bg-base-100 shadow-md">
                                <div class="card-body flex-row items-center gap-4">
                                    <div class="avatar avatar-placeholder">
                                        <div class="bg-primary text-primary-content rounded-full w-16">
                                            <span class="text-2xl">{initial}</span>
                                        </div>
                                    </div>
                                    <div class="flex flex-col gap-1">
                                        <span class="text-lg font-medium">{email.clone()}</span>
                                        <span class=role_badge_class(session.role)>{session.role.as_str()}</span>
                                    </div>
                                </div>
                            </div>

                            <div class="card bg-base-100 shadow-md mt-4">
                                <div class="card-body">
                                    <h2 class="card-title text-lg">"账户信息"</h2>
                                    <div class="grid grid-cols-1 sm:grid-cols-2 gap-4 text-sm">
                                        <div>
                                            <div class="text-base-content/50">"邮箱"</div>
                                            <div>{email}</div>
                                        </div>
                                        <div>
                                            <div class="text-base-content/50">"角色"</div>
                                            <div>{session.role.as_str()}</div>
                                        </div>
                                        <div>
                                            <div class="text-base-content/50">"用户标识"</div>
                                            <div class="font-mono text-xs">{session.user_id.clone()}</div>
                                        </div>
                                    </div>
                                </div>
                            </div>
                        }
                        .into_any()
                    }
                }
            }}
        </div>
    }
}
