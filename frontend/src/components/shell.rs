use crate::auth::{logout, use_auth};
use crate::components::icons::{HardHat, LogOut};
use crate::web::router::use_router;
use leptos::prelude::*;
use sitetrack_shared::Role;

/// 角色徽章的 daisyUI 配色，各页面共用
pub fn role_badge_class(role: Role) -> &'static str {
    match role {
        Role::Admin => "badge badge-error",
        Role::Supervisor => "badge badge-warning",
        Role::Foreman => "badge badge-success",
        Role::User => "badge badge-neutral",
    }
}

/// 受保护区域的导航外壳
///
/// 管理端入口按当前角色实时显隐；角色在每次渲染时从会话上下文
/// 重新读取，不做任何缓存。
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let auth_ctx = use_auth();
    let auth_state = auth_ctx.state;
    let router = use_router();

    let is_admin = move || auth_state.get().role().is_admin();

    let nav = move |path: &'static str| {
        move |_| {
            router.navigate(path);
        }
    };

    let on_logout = move |_| {
        // 导航由路由服务的 Token 监听自动处理
        logout(&auth_ctx);
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-md px-4">
                <div class="flex-1 gap-2">
                    <HardHat attr:class="text-primary h-6 w-6" />
                    <a class="btn btn-ghost text-xl" on:click=nav("/home")>"SiteTrack"</a>
                    <span class="badge badge-neutral hidden md:inline-flex">
                        {move || auth_state.get().session.map(|s| s.email.unwrap_or(s.user_id)).unwrap_or_default()}
                    </span>
                </div>
                <div class="flex-none gap-1">
                    <button class="btn btn-ghost btn-sm" on:click=nav("/home")>"项目总览"</button>
                    <Show when=is_admin>
                        <button class="btn btn-ghost btn-sm" on:click=nav("/admin/projects")>"项目管理"</button>
                        <button class="btn btn-ghost btn-sm" on:click=nav("/admin/assignments")>"分配管理"</button>
                        <button class="btn btn-ghost btn-sm" on:click=nav("/admin/users")>"用户管理"</button>
                    </Show>
                    <button class="btn btn-ghost btn-sm" on:click=nav("/profile")>"个人资料"</button>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "退出登录"
                    </button>
                </div>
            </div>

            <main class="p-4 md:p-8">
                {children()}
            </main>
        </div>
    }
}
