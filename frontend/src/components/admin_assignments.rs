use crate::auth::use_auth;
use crate::components::icons::Trash2;
use crate::components::shell::role_badge_class;
use crate::web::router::use_router;
use crate::web::{FetchGuard, confirm};
use leptos::prelude::*;
use leptos::task::spawn_local;
use sitetrack_shared::protocol::NewAssignment;
use sitetrack_shared::{Assignment, Project, Role, UserAccount, Zone};

/// 分配管理页（仅管理员）
///
/// 列表随筛选条件切换到不同的后端过滤接口；分区下拉跟随所选
/// 项目。两类请求都经过 FetchGuard，快速切换筛选时迟到的旧响应
/// 会被丢弃。
#[component]
pub fn AdminAssignmentsPage() -> impl IntoView {
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
    let (projects, set_projects) = signal(Vec::<Project>::new());
    let (zones, set_zones) = signal(Vec::<Zone>::new());
    let (assignments, set_assignments) = signal(Vec::<Assignment>::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 表单兼筛选条件：选中的用户/项目/分区同时决定列表接口
    let f_user_id = RwSignal::new(String::new());
    let f_project_id = RwSignal::new(String::new());
    let f_zone_id = RwSignal::new(String::new());
    let f_role = RwSignal::new(Role::User);

    let assignments_guard = StoredValue::new(FetchGuard::new());
    let zones_guard = StoredValue::new(FetchGuard::new());

    // 页面卸载后，仍在途的响应一律作废
    on_cleanup({
        let assignments_guard = assignments_guard.get_value();
        let zones_guard = zones_guard.get_value();
        move || {
            assignments_guard.invalidate();
            zones_guard.invalidate();
        }
    });

    // 基础数据：用户与项目
    Effect::new(move |_| {
        let state = auth_state.get();
        if state.is_loading || !state.role().is_admin() {
            return;
        }
        let Some(api) = state.api() else { return };
        spawn_local(async move {
            match api.get_users().await {
                Ok(list) => set_users.set(list),
                Err(_) => set_users.set(Vec::new()),
            }
            match api.get_projects().await {
                Ok(list) => set_projects.set(list),
                Err(_) => set_projects.set(Vec::new()),
            }
        });
    });

    let fetch_assignments = move || {
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        let guard = assignments_guard.get_value();
        let issue = guard.begin();

        let user_id = f_user_id.get_untracked();
        let project_id = f_project_id.get_untracked();
        let zone_id = f_zone_id.get_untracked();

        spawn_local(async move {
            let result = if !user_id.is_empty() {
                api.get_assignments_for_user(&user_id).await
            } else if !project_id.is_empty() && !zone_id.is_empty() {
                api.get_assignments_for_project_zone(&project_id, &zone_id)
                    .await
            } else if !project_id.is_empty() {
                api.get_assignments_for_project(&project_id).await
            } else {
                api.get_assignments().await
            };

            if !guard.is_current(issue) {
                return;
            }
            match result {
                Ok(list) => set_assignments.set(list),
                Err(e) => {
                    set_assignments.set(Vec::new());
                    set_error_msg.set(Some(e));
                }
            }
        });
    };

    // 筛选条件变化时重新拉取列表
    Effect::new(move |_| {
        f_user_id.track();
        f_project_id.track();
        f_zone_id.track();
        let state = auth_state.get();
        if !state.is_loading && state.role().is_admin() {
            fetch_assignments();
        }
    });

    // 分区下拉跟随所选项目
    Effect::new(move |_| {
        let project_id = f_project_id.get();
        let state = auth_state.get();
        if state.is_loading || !state.role().is_admin() {
            return;
        }
        if project_id.is_empty() {
            set_zones.set(Vec::new());
            return;
        }
        let Some(api) = state.api() else { return };
        let guard = zones_guard.get_value();
        let issue = guard.begin();
        spawn_local(async move {
            match api.get_zones_for_project(&project_id).await {
                Ok(list) => {
                    if guard.is_current(issue) {
                        set_zones.set(list);
                    }
                }
                Err(_) => {
                    if guard.is_current(issue) {
                        set_zones.set(Vec::new());
                    }
                }
            }
        });
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        set_error_msg.set(None);

        let zone_id = f_zone_id.get_untracked();
        let body = NewAssignment {
            user_id: f_user_id.get_untracked(),
            project_id: f_project_id.get_untracked(),
            role: f_role.get_untracked(),
            // 未选分区 = 覆盖整个项目（序列化为 null）
            zone_id: if zone_id.is_empty() { None } else { Some(zone_id) },
        };

        spawn_local(async move {
            match api.create_assignment(&body).await {
                Ok(()) => {
                    f_user_id.set(String::new());
                    f_project_id.set(String::new());
                    f_zone_id.set(String::new());
                    f_role.set(Role::User);
                    // 清空筛选后重新拉取即为全量列表
                }
                Err(e) => set_error_msg.set(Some(e)),
            }
        });
    };

    // 删除以 (projectId, userId) 为键；本地按记录 id 精确移除
    let handle_delete = move |assignment: Assignment| {
        if !confirm("确定要移除这条分配吗？") {
            return;
        }
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        spawn_local(async move {
            match api
                .delete_assignment(&assignment.project_id, &assignment.user_id)
                .await
            {
                Ok(()) => {
                    set_assignments.update(|list| list.retain(|a| a.id != assignment.id));
                }
                Err(e) => set_error_msg.set(Some(e)),
            }
        });
    };

    let user_email = move |user_id: &str| -> String {
        users
            .get()
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.email.clone())
            .unwrap_or_else(|| "未知用户".to_string())
    };

    let project_name = move |project_id: &str| -> String {
        projects
            .get()
            .iter()
            .find(|p| p.id == project_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "未知项目".to_string())
    };

    let zone_name = move |zone_id: &Option<String>| -> String {
        match zone_id {
            None => "覆盖整个项目".to_string(),
            Some(id) => zones
                .get()
                .iter()
                .find(|z| &z.id == id)
                .map(|z| z.name.clone())
                .unwrap_or_else(|| "未知分区".to_string()),
        }
    };

    view! {
        <div class="max-w-6xl mx-auto space-y-6">
            <h1 class="text-2xl font-bold">"管理分配"</h1>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            // 新建分配（选择器同时充当列表筛选）
            <div class="card bg-base-100 shadow-md">
                <div class="card-body">
                    <h2 class="card-title text-lg">"分配用户到项目 / 分区"</h2>
                    <form on:submit=on_submit class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-5 gap-2">
                        <select required
                            class="select select-bordered"
                            on:change=move |ev| f_user_id.set(event_target_value(&ev))
                            prop:value=f_user_id
                        >
                            <option value="" selected=move || f_user_id.get().is_empty()>"选择用户"</option>
                            <For
                                each=move || users.get()
                                key=|u| u.id.clone()
                                children=move |user| {
                                    view! { <option value=user.id.clone()>{user.email.clone()}</option> }
                                }
                            />
                        </select>

                        <select required
                            class="select select-bordered"
                            on:change=move |ev| {
                                f_project_id.set(event_target_value(&ev));
                                // 切换项目后旧的分区选择不再有效
                                f_zone_id.set(String::new());
                            }
                            prop:value=f_project_id
                        >
                            <option value="" selected=move || f_project_id.get().is_empty()>"选择项目"</option>
                            <For
                                each=move || projects.get()
                                key=|p| p.id.clone()
                                children=move |project| {
                                    view! { <option value=project.id.clone()>{project.name.clone()}</option> }
                                }
                            />
                        </select>

                        <select
                            class="select select-bordered"
                            on:change=move |ev| f_zone_id.set(event_target_value(&ev))
                            prop:value=f_zone_id
                        >
                            <option value="" selected=move || f_zone_id.get().is_empty()>"覆盖整个项目"</option>
                            <For
                                each=move || zones.get()
                                key=|z| z.id.clone()
                                children=move |zone| {
                                    view! { <option value=zone.id.clone()>{zone.name.clone()}</option> }
                                }
                            />
                        </select>

                        <select
                            class="select select-bordered"
                            on:change=move |ev| f_role.set(Role::from_claim(&event_target_value(&ev)))
                        >
                            <option value="user" selected=move || f_role.get() == Role::User>"普通用户"</option>
                            <option value="foreman" selected=move || f_role.get() == Role::Foreman>"工长"</option>
                            <option value="supervisor" selected=move || f_role.get() == Role::Supervisor>"监理"</option>
                        </select>

                        <button type="submit" class="btn btn-primary">"创建分配"</button>
                    </form>
                </div>
            </div>

            // 分配列表
            <div class="card bg-base-100 shadow-md">
                <div class="card-body p-0">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"用户"</th>
                                <th>"项目"</th>
                                <th>"范围"</th>
                                <th>"角色"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || assignments.with(|a| a.is_empty())>
                                <tr>
                                    <td colspan="5" class="text-center py-8 text-base-content/50">
                                        "没有匹配的分配记录。"
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || assignments.get()
                                key=|a| a.id.clone()
                                children=move |assignment| {
                                    let delete_target = assignment.clone();
                                    view! {
                                        <tr>
                                            <td class="text-sm">{user_email(&assignment.user_id)}</td>
                                            <td class="text-sm">{project_name(&assignment.project_id)}</td>
                                            <td class="text-xs text-base-content/60">{zone_name(&assignment.zone_id)}</td>
                                            <td>
                                                <span class=role_badge_class(assignment.role)>{assignment.role.as_str()}</span>
                                            </td>
                                            <td>
                                                <div class="flex justify-end">
                                                    <button class="btn btn-ghost btn-sm text-error gap-1" on:click=move |_| handle_delete(delete_target.clone())>
                                                        <Trash2 attr:class="h-4 w-4" /> "移除"
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
