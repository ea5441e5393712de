//! SiteTrack 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫规则（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态管理
//! - `api`: REST 客户端
//! - `components`: 页面层

mod api;
mod auth;
mod components {
    pub mod admin_assignments;
    pub mod admin_projects;
    pub mod admin_users;
    pub mod admin_zones;
    pub mod build_logs;
    mod icons;
    pub mod profile;
    pub mod projects;
    pub mod redirect;
    pub mod shell;
    pub mod signin;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::admin_assignments::AdminAssignmentsPage;
use crate::components::admin_projects::AdminProjectsPage;
use crate::components::admin_users::AdminUsersPage;
use crate::components::admin_zones::AdminZonesPage;
use crate::components::build_logs::BuildLogsPage;
use crate::components::profile::ProfilePage;
use crate::components::projects::ProjectsPage;
use crate::components::redirect::RoleRedirectPage;
use crate::components::shell::Shell;
use crate::components::signin::SignInPage;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod confirm;
    mod date;
    mod fetch_guard;
    pub mod route;
    pub mod router;
    mod storage;

    pub use confirm::confirm;
    pub use date::{format_display, now_iso, today_iso};
    pub use fetch_guard::FetchGuard;
    pub use storage::LocalStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 把受保护页面包进统一的导航外壳
fn in_shell(content: AnyView) -> AnyView {
    view! { <Shell>{content}</Shell> }.into_any()
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::SignIn => view! { <SignInPage /> }.into_any(),
        AppRoute::Redirect => in_shell(view! { <RoleRedirectPage /> }.into_any()),
        AppRoute::Home => in_shell(view! { <ProjectsPage /> }.into_any()),
        AppRoute::Profile => in_shell(view! { <ProfilePage /> }.into_any()),
        AppRoute::AdminUsers => in_shell(view! { <AdminUsersPage /> }.into_any()),
        AppRoute::AdminProjects => in_shell(view! { <AdminProjectsPage /> }.into_any()),
        AppRoute::AdminAssignments => in_shell(view! { <AdminAssignmentsPage /> }.into_any()),
        AppRoute::AdminZones(project_id) => {
            in_shell(view! { <AdminZonesPage project_id=project_id /> }.into_any())
        }
        AppRoute::BuildLogsProject(project_id) => in_shell(
            view! { <BuildLogsPage project_id=Some(project_id) zone_id=None /> }.into_any(),
        ),
        AppRoute::BuildLogsZone(zone_id) => in_shell(
            view! { <BuildLogsPage project_id=None zone_id=Some(zone_id) /> }.into_any(),
        ),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文（同步读取已存储的 Token）
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 获取 Token 持有信号，用于注入路由服务（解耦！）
    let has_token = auth_ctx.has_token_signal();

    view! {
        // 3. 路由器组件：注入 Token 信号实现守卫
        <Router has_token=has_token>
            {
                // 4. 路由器就绪后才解码声明：守卫按 Token 存在性先放行，
                //    解码失败走会话上下文的强制登出路径（两步时序不可合并）
                init_auth(&auth_ctx);
                view! { <RouterOutlet matcher=route_matcher /> }
            }
        </Router>
    }
}
