use crate::auth::use_auth;
use crate::components::icons::{ClipboardList, MapPin, RefreshCw};
use crate::components::shell::role_badge_class;
use crate::web::router::use_router;
use crate::web::{FetchGuard, format_display};
use leptos::prelude::*;
use leptos::task::spawn_local;
use sitetrack_shared::{Assignment, Project, ProjectStatus, Role, Zone};

/// 项目总览（所有角色的共享首页）
///
/// 管理员看到全部项目；其他角色从自己的分配记录出发，
/// 解析出涉及的项目与分区，并展示自己在每个项目上的角色。
#[component]
pub fn ProjectsPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let auth_state = auth_ctx.state;
    let router = use_router();

    let (projects, set_projects) = signal(Vec::<Project>::new());
    let (assignments, set_assignments) = signal(Vec::<Assignment>::new());
    let (zones, set_zones) = signal(Vec::<Zone>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);
    let guard = FetchGuard::new();

    // 页面卸载后，仍在途的响应一律作废
    on_cleanup({
        let guard = guard.clone();
        move || guard.invalidate()
    });

    let load = {
        let guard = guard.clone();
        move || {
            let state = auth_state.get_untracked();
            let Some(api) = state.api() else { return };
            let Some(session) = state.session else { return };

            let issue = guard.begin();
            let guard = guard.clone();
            set_loading.set(true);

            spawn_local(async move {
                if session.role.is_admin() {
                    match api.get_projects().await {
                        Ok(list) => {
                            if guard.is_current(issue) {
                                set_projects.set(list);
                                set_assignments.set(Vec::new());
                                set_zones.set(Vec::new());
                            }
                        }
                        Err(e) => {
                            if guard.is_current(issue) {
                                set_notification.set(Some((e, true)));
                            }
                        }
                    }
                } else {
                    match api.get_assignments_for_user(&session.user_id).await {
                        Ok(list) => {
                            let valid: Vec<Assignment> = list
                                .into_iter()
                                .filter(|a| !a.project_id.is_empty())
                                .collect();

                            let mut project_ids: Vec<String> =
                                valid.iter().map(|a| a.project_id.clone()).collect();
                            project_ids.sort();
                            project_ids.dedup();

                            // 指向已删除项目的分配直接跳过
                            let mut resolved = Vec::new();
                            for id in &project_ids {
                                if let Ok(project) = api.get_project(id).await {
                                    resolved.push(project);
                                }
                            }

                            let mut zone_ids: Vec<String> =
                                valid.iter().filter_map(|a| a.zone_id.clone()).collect();
                            zone_ids.sort();
                            zone_ids.dedup();

                            let mut resolved_zones = Vec::new();
                            for id in &zone_ids {
                                if let Ok(zone) = api.get_zone(id).await {
                                    resolved_zones.push(zone);
                                }
                            }

                            if guard.is_current(issue) {
                                set_assignments.set(valid);
                                set_projects.set(resolved);
                                set_zones.set(resolved_zones);
                            }
                        }
                        Err(e) => {
                            if guard.is_current(issue) {
                                set_notification.set(Some((e, true)));
                            }
                        }
                    }
                }
                if guard.is_current(issue) {
                    set_loading.set(false);
                }
            });
        }
    };

    // 初始加载（声明解码完成后）
    Effect::new({
        let load = load.clone();
        move |_| {
            let state = auth_state.get();
            if !state.is_loading && state.session.is_some() {
                load();
            }
        }
    });

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    let is_admin = move || auth_state.get().role().is_admin();

    // 当前用户在某个项目上的角色，每次渲染重新读取会话上下文
    let role_for_project = move |project_id: &str| -> Role {
        if is_admin() {
            return Role::Admin;
        }
        assignments
            .get()
            .iter()
            .find(|a| a.project_id == project_id)
            .map(|a| a.role)
            .unwrap_or_default()
    };

    let zones_for_project = move |project_id: &str| -> Vec<Zone> {
        zones
            .get()
            .into_iter()
            .filter(|z| z.project_id == project_id)
            .collect()
    };

    let total_projects = move || projects.with(|p| p.len());

    view! {
        <div class="max-w-7xl mx-auto space-y-6">
            // 通知提示框
            <Show when=move || notification.get().is_some()>
                <div class="toast toast-top toast-end z-50">
                    <div class=move || {
                        if notification.get().map(|(_, is_err)| is_err).unwrap_or(false) {
                            "alert alert-error shadow-lg"
                        } else {
                            "alert alert-success shadow-lg"
                        }
                    }>
                        <span>{move || notification.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                    </div>
                </div>
            </Show>

            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-bold">"项目总览"</h1>
                    <p class="text-base-content/70 text-sm">
                        {move || if is_admin() {
                            format!("共 {} 个项目", total_projects())
                        } else {
                            format!("您参与了 {} 个项目", total_projects())
                        }}
                    </p>
                </div>
                <div class="flex gap-2">
                    <Show when=is_admin>
                        <button class="btn btn-primary btn-sm" on:click=move |_| router.navigate("/admin/projects")>
                            "管理项目"
                        </button>
                    </Show>
                    <button
                        class="btn btn-ghost btn-circle btn-sm"
                        disabled=move || loading.get()
                        on:click={
                            let load = load.clone();
                            move |_| load()
                        }
                    >
                        <RefreshCw attr:class=move || if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                    </button>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"项目"</th>
                                    <th class="hidden md:table-cell">"工期"</th>
                                    <th>"状态"</th>
                                    <th>"我的角色"</th>
                                    <th class="hidden md:table-cell">"分区"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || total_projects() == 0 && !loading.get()>
                                    <tr>
                                        <td colspan="6" class="text-center py-8 text-base-content/50">
                                            {move || if is_admin() {
                                                "暂无项目。"
                                            } else {
                                                "您还没有被分配到任何项目。"
                                            }}
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || loading.get() && total_projects() == 0>
                                    <tr>
                                        <td colspan="6" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span> " 加载中..."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || projects.get()
                                    key=|p| p.id.clone()
                                    children=move |project| {
                                        let project_id = project.id.clone();
                                        let role = role_for_project(&project_id);
                                        let project_zones = zones_for_project(&project_id);
                                        let logs_id = project_id.clone();
                                        view! {
                                            <tr>
                                                <td>
                                                    <div class="flex flex-col">
                                                        <span class="font-medium text-sm">{project.name.clone()}</span>
                                                        <span class="text-xs text-base-content/50 mt-1">{project.description.clone()}</span>
                                                    </div>
                                                </td>
                                                <td class="hidden md:table-cell text-xs">
                                                    {format_display(&project.start_date)} " → " {format_display(&project.end_date)}
                                                </td>
                                                <td>
                                                    <span class=move || if project.status == ProjectStatus::Active {
                                                        "badge badge-success badge-outline"
                                                    } else {
                                                        "badge badge-ghost"
                                                    }>
                                                        {project.status.as_str()}
                                                    </span>
                                                </td>
                                                <td>
                                                    <span class=role_badge_class(role)>{role.as_str()}</span>
                                                </td>
                                                <td class="hidden md:table-cell">
                                                    <div class="flex flex-wrap gap-1">
                                                        {project_zones
                                                            .into_iter()
                                                            .map(|zone| {
                                                                let zone_path = format!("/build-logs/zone/{}", zone.id);
                                                                view! {
                                                                    <button
                                                                        class="badge badge-outline gap-1 cursor-pointer"
                                                                        on:click=move |_| router.navigate(&zone_path)
                                                                    >
                                                                        <MapPin attr:class="h-3 w-3" />
                                                                        {zone.name.clone()}
                                                                    </button>
                                                                }
                                                            })
                                                            .collect_view()}
                                                    </div>
                                                </td>
                                                <td>
                                                    <button
                                                        class="btn btn-ghost btn-sm gap-1"
                                                        on:click=move |_| router.navigate(&format!("/build-logs/project/{}", logs_id))
                                                    >
                                                        <ClipboardList attr:class="h-4 w-4" /> "施工日志"
                                                    </button>
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
        </div>
    }
}
