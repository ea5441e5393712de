use crate::auth::use_auth;
use crate::components::icons::{MapPin, Pencil, Trash2};
use crate::web::router::use_router;
use crate::web::{confirm, format_display};
use leptos::prelude::*;
use leptos::task::spawn_local;
use sitetrack_shared::protocol::ProjectDraft;
use sitetrack_shared::{Project, ProjectStatus};

/// 项目管理页（仅管理员）
#[component]
pub fn AdminProjectsPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let auth_state = auth_ctx.state;
    let router = use_router();

    // 非管理员重定向回首页（每次渲染都重新读取角色）
    Effect::new(move |_| {
        let state = auth_state.get();
        if !state.is_loading && !state.role().is_admin() {
            router.replace("/home");
        }
    });

    let (projects, set_projects) = signal(Vec::<Project>::new());
    let (editing, set_editing) = signal(Option::<Project>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 表单字段
    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let start_date = RwSignal::new(String::new());
    let end_date = RwSignal::new(String::new());
    let status = RwSignal::new(ProjectStatus::Active);

    let reset_form = move || {
        name.set(String::new());
        description.set(String::new());
        start_date.set(String::new());
        end_date.set(String::new());
        status.set(ProjectStatus::Active);
        set_editing.set(None);
    };

    let load_projects = move || {
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        spawn_local(async move {
            match api.get_projects().await {
                Ok(list) => set_projects.set(list),
                Err(e) => set_error_msg.set(Some(e)),
            }
        });
    };

    Effect::new(move |_| {
        let state = auth_state.get();
        if !state.is_loading && state.role().is_admin() {
            load_projects();
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let state = auth_state.get_untracked();
        let Some(api) = state.api() else { return };
        let Some(session) = state.session else {
            return;
        };
        set_error_msg.set(None);

        let draft = ProjectDraft {
            name: name.get_untracked(),
            description: description.get_untracked(),
            start_date: start_date.get_untracked(),
            end_date: end_date.get_untracked(),
            status: status.get_untracked(),
            created_by: session.user_id,
        };
        let editing_id = editing.get_untracked().map(|p| p.id);

        spawn_local(async move {
            let result = match &editing_id {
                Some(id) => api.update_project(id, &draft).await,
                None => api.create_project(&draft).await,
            };
            match result {
                Ok(()) => {
                    // 以服务端为准，提交后重新拉取
                    reset_form();
                    load_projects();
                }
                Err(e) => set_error_msg.set(Some(e)),
            }
        });
    };

    let handle_edit = move |project: Project| {
        // 日期输入框只接受 YYYY-MM-DD
        name.set(project.name.clone());
        description.set(project.description.clone());
        start_date.set(project.start_date.chars().take(10).collect());
        end_date.set(project.end_date.chars().take(10).collect());
        status.set(project.status);
        set_editing.set(Some(project));
    };

    let handle_delete = move |id: String| {
        if !confirm("确定要删除这个项目吗？") {
            return;
        }
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        spawn_local(async move {
            match api.delete_project(&id).await {
                Ok(()) => load_projects(),
                Err(e) => set_error_msg.set(Some(e)),
            }
        });
    };

    view! {
        <div class="max-w-6xl mx-auto space-y-6">
            <h1 class="text-2xl font-bold">"管理项目"</h1>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            // 创建 / 编辑表单
            <div class="card bg-base-100 shadow-md">
                <div class="card-body">
                    <h2 class="card-title text-lg">
                        {move || if editing.get().is_some() { "编辑项目" } else { "创建新项目" }}
                    </h2>
                    <form on:submit=on_submit class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="project-name">
                                <span class="label-text">"项目名称"</span>
                            </label>
                            <input id="project-name" required
                                type="text"
                                placeholder="项目名称"
                                on:input=move |ev| name.set(event_target_value(&ev))
                                prop:value=name
                                class="input input-bordered w-full"
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="project-status">
                                <span class="label-text">"状态"</span>
                            </label>
                            <select
                                id="project-status"
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    if event_target_value(&ev) == "completed" {
                                        status.set(ProjectStatus::Completed);
                                    } else {
                                        status.set(ProjectStatus::Active);
                                    }
                                }
                            >
                                <option value="active" selected=move || status.get() == ProjectStatus::Active>"进行中"</option>
                                <option value="completed" selected=move || status.get() == ProjectStatus::Completed>"已完工"</option>
                            </select>
                        </div>

                        <div class="form-control sm:col-span-2">
                            <label class="label" for="project-description">
                                <span class="label-text">"描述"</span>
                            </label>
                            <textarea id="project-description" required rows="3"
                                placeholder="描述"
                                on:input=move |ev| description.set(event_target_value(&ev))
                                prop:value=description
                                class="textarea textarea-bordered w-full"
                            ></textarea>
                        </div>

                        <div class="form-control">
                            <label class="label" for="project-start">
                                <span class="label-text">"开工日期"</span>
                            </label>
                            <input id="project-start" required
                                type="date"
                                on:input=move |ev| start_date.set(event_target_value(&ev))
                                prop:value=start_date
                                class="input input-bordered w-full"
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="project-end">
                                <span class="label-text">"完工日期"</span>
                            </label>
                            <input id="project-end" required
                                type="date"
                                on:input=move |ev| end_date.set(event_target_value(&ev))
                                prop:value=end_date
                                class="input input-bordered w-full"
                            />
                        </div>

                        <div class="sm:col-span-2 flex justify-end gap-2 mt-2">
                            <Show when=move || editing.get().is_some()>
                                <button type="button" class="btn btn-ghost" on:click=move |_| reset_form()>
                                    "取消"
                                </button>
                            </Show>
                            <button type="submit" class="btn btn-primary">
                                {move || if editing.get().is_some() { "更新项目" } else { "创建项目" }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>

            // 项目列表
            <div class="card bg-base-100 shadow-md">
                <div class="card-body p-0">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"项目"</th>
                                    <th class="hidden md:table-cell">"工期"</th>
                                    <th>"状态"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || projects.with(|p| p.is_empty())>
                                    <tr>
                                        <td colspan="4" class="text-center py-8 text-base-content/50">
                                            "暂无项目。"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || projects.get()
                                    key=|p| p.id.clone()
                                    children=move |project| {
                                        let delete_id = project.id.clone();
                                        let zones_path = format!("/admin/projects/{}/zones", project.id);
                                        let edit_target = project.clone();
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
                                                    <div class="flex gap-1 justify-end">
                                                        <button class="btn btn-ghost btn-sm gap-1" on:click=move |_| handle_edit(edit_target.clone())>
                                                            <Pencil attr:class="h-4 w-4" /> "编辑"
                                                        </button>
                                                        <button class="btn btn-ghost btn-sm gap-1" on:click=move |_| router.navigate(&zones_path)>
                                                            <MapPin attr:class="h-4 w-4" /> "管理分区"
                                                        </button>
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
        </div>
    }
}
