use crate::auth::use_auth;
use crate::components::icons::{Trash2, Users};
use crate::components::shell::role_badge_class;
use crate::web::confirm;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use sitetrack_shared::protocol::NewUser;
use sitetrack_shared::{Role, UserAccount};

/// 用户管理页（仅管理员）
#[component]
pub fn AdminUsersPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let auth_state = auth_ctx.state;
    let router = use_router();

    // 非管理员重定向回首页
    Effect::new(move |_| {
        let state = auth_state.get();
        if !state.is_loading && !state.role().is_admin() {
            router.replace("/home");
        }
    });

    let (users, set_users) = signal(Vec::<UserAccount>::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(Role::User);

    let fetch_users = move || {
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        spawn_local(async move {
            match api.get_users().await {
                Ok(list) => set_users.set(list),
                Err(e) => {
                    // 形状异常或请求失败都按空列表处理，页面继续可用
                    web_sys::console::warn_1(&format!("[Users] {}", e).into());
                    set_users.set(Vec::new());
                }
            }
        });
    };

    Effect::new(move |_| {
        let state = auth_state.get();
        if !state.is_loading && state.role().is_admin() {
            fetch_users();
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        set_error_msg.set(None);

        let new_user = NewUser {
            email: email.get_untracked(),
            password: password.get_untracked(),
            role: role.get_untracked(),
        };

        spawn_local(async move {
            match api.create_user(&new_user).await {
                Ok(()) => {
                    email.set(String::new());
                    password.set(String::new());
                    role.set(Role::User);
                    fetch_users();
                }
                Err(e) => set_error_msg.set(Some(e)),
            }
        });
    };

    let handle_delete = move |id: String| {
        if !confirm("确定要删除这个用户吗？") {
            return;
        }
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        spawn_local(async move {
            match api.delete_user(&id).await {
                Ok(()) => fetch_users(),
                Err(e) => set_error_msg.set(Some(e)),
            }
        });
    };

    view! {
        <div class="max-w-4xl mx-auto space-y-6">
            <div class="flex items-center gap-2">
                <Users attr:class="h-6 w-6 text-primary" />
                <h1 class="text-2xl font-bold">"用户管理"</h1>
            </div>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            // 创建用户
            <div class="card bg-base-100 shadow-md">
                <div class="card-body">
                    <h2 class="card-title text-lg">"创建用户"</h2>
                    <form on:submit=on_submit class="flex flex-col sm:flex-row gap-2">
                        <input required
                            type="email"
                            placeholder="邮箱"
                            on:input=move |ev| email.set(event_target_value(&ev))
                            prop:value=email
                            class="input input-bordered flex-1"
                        />
                        <input required
                            type="password"
                            placeholder="密码"
                            on:input=move |ev| password.set(event_target_value(&ev))
                            prop:value=password
                            class="input input-bordered flex-1"
                        />
                        <select
                            class="select select-bordered"
                            on:change=move |ev| role.set(Role::from_claim(&event_target_value(&ev)))
                        >
                            <option value="user" selected=move || role.get() == Role::User>"普通用户"</option>
                            <option value="foreman" selected=move || role.get() == Role::Foreman>"工长"</option>
                            <option value="supervisor" selected=move || role.get() == Role::Supervisor>"监理"</option>
                        </select>
                        <button type="submit" class="btn btn-primary">"创建"</button>
                    </form>
                </div>
            </div>

            // 用户列表
            <div class="card bg-base-100 shadow-md">
                <div class="card-body p-0">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"邮箱"</th>
                                <th>"角色"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || users.with(|u| u.is_empty())>
                                <tr>
                                    <td colspan="3" class="text-center py-8 text-base-content/50">
                                        "暂无用户。"
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || users.get()
                                key=|u| u.id.clone()
                                children=move |user| {
                                    let delete_id = user.id.clone();
                                    view! {
                                        <tr>
                                            <td class="text-sm">{user.email.clone()}</td>
                                            <td>
                                                <span class=role_badge_class(user.role)>{user.role.as_str()}</span>
                                            </td>
                                            <td>
                                                <div class="flex justify-end">
                                                    <button class="btn btn-ghost btn-sm text-error gap-1" on:click=move |_| handle_delete(delete_id.clone())>
                                                        <Trash2 attr:class="h-4 w-4" /> "删除"
                                                    </button>
                                                </div>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
