use crate::auth::use_auth;
use crate::web::route::landing_for_role;
use crate::web::router::use_router;
use leptos::prelude::*;

/// 中性入口页：已认证用户按角色分流到落地页
///
/// 路由守卫保证进到这里时 Token 已存在；声明尚未解码完成时等待，
/// 解码失败的强制登出由路由服务接管。
#[component]
pub fn RoleRedirectPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();

    Effect::new(move |_| {
        let state = auth_ctx.state.get();
        if state.is_loading || state.token.is_none() {
            return;
        }
        // 重定向不产生后退项
        router.replace(&landing_for_role(state.role()).to_path());
    });

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}
