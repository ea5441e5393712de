use crate::auth::use_auth;
use crate::components::icons::{ChevronRight, Pencil, Trash2};
use crate::web::router::use_router;
use crate::web::{FetchGuard, confirm};
use leptos::prelude::*;
use leptos::task::spawn_local;
use sitetrack_shared::Zone;
use sitetrack_shared::protocol::ZoneDraft;

/// 某个项目下的分区管理页（仅管理员）
///
/// 连续在项目之间跳转会产生并发的分区请求；所有写入都经过
/// FetchGuard，迟到的旧项目响应不会覆盖当前项目的列表。
#[component]
pub fn AdminZonesPage(project_id: String) -> impl IntoView {
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

    let project_id = StoredValue::new(project_id);

    let (zones, set_zones) = signal(Vec::<Zone>::new());
    let (project_name, set_project_name) = signal(String::from("项目"));
    let (editing, set_editing) = signal(Option::<Zone>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(true);
    let guard = StoredValue::new(FetchGuard::new());

    // 页面卸载后，仍在途的响应一律作废
    on_cleanup({
        let guard = guard.get_value();
        move || guard.invalidate()
    });

    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());

    let reset_form = move || {
        name.set(String::new());
        description.set(String::new());
        set_editing.set(None);
    };

    let fetch_zones = move || {
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        let guard = guard.get_value();
        let issue = guard.begin();
        let project_id = project_id.get_value();
        set_loading.set(true);

        spawn_local(async move {
            // 先取项目名用于面包屑，失败不阻塞分区列表
            if let Ok(project) = api.get_project(&project_id).await {
                if guard.is_current(issue) {
                    set_project_name.set(project.name);
                }
            }

            match api.get_zones_for_project(&project_id).await {
                Ok(list) => {
                    if guard.is_current(issue) {
                        set_zones.set(list);
                    }
                }
                Err(e) => {
                    if guard.is_current(issue) {
                        set_error_msg.set(Some(e));
                    }
                }
            }
            if guard.is_current(issue) {
                set_loading.set(false);
            }
        });
    };

    Effect::new(move |_| {
        let state = auth_state.get();
        if !state.is_loading && state.role().is_admin() {
            fetch_zones();
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        set_error_msg.set(None);

        let draft = ZoneDraft {
            name: name.get_untracked(),
            description: description.get_untracked(),
            project_id: project_id.get_value(),
        };
        let editing_id = editing.get_untracked().map(|z| z.id);

        spawn_local(async move {
            let result = match &editing_id {
                Some(id) => api.update_zone(id, &draft).await,
                None => api.create_zone(&draft).await,
            };
            match result {
                Ok(()) => {
                    reset_form();
                    fetch_zones();
                }
                Err(e) => set_error_msg.set(Some(e)),
            }
        });
    };

    let handle_edit = move |zone: Zone| {
        name.set(zone.name.clone());
        description.set(zone.description.clone());
        set_editing.set(Some(zone));
    };

    let handle_delete = move |id: String| {
        if !confirm("确定要删除这个分区吗？") {
            return;
        }
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        spawn_local(async move {
            match api.delete_zone(&id).await {
                Ok(()) => fetch_zones(),
                Err(e) => set_error_msg.set(Some(e)),
            }
        });
    };

    view! {
        <div class="max-w-4xl mx-auto space-y-6">
            // 面包屑
            <div>
                <div class="flex items-center text-sm text-base-content/60 mb-2">
                    <button class="hover:underline" on:click=move |_| router.navigate("/admin/projects")>
                        "项目"
                    </button>
                    <ChevronRight attr:class="h-4 w-4 mx-1" />
                    <span>{move || project_name.get()}</span>
                    <ChevronRight attr:class="h-4 w-4 mx-1" />
                    <span class="font-medium text-base-content">"分区"</span>
                </div>
                <h1 class="text-2xl font-bold">"管理分区"</h1>
                <p class="text-base-content/70 mt-1">
                    {move || format!("为 {} 创建和管理分区", project_name.get())}
                </p>
            </div>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            // 分区表单
            <div class="card bg-base-100 shadow-md">
                <div class="card-body">
                    <h2 class="card-title text-lg">
                        {move || if editing.get().is_some() { "编辑分区" } else { "创建新分区" }}
                    </h2>
                    <form on:submit=on_submit class="space-y-4">
                        <div class="form-control">
                            <label class="label" for="zone-name">
                                <span class="label-text">"分区名称"</span>
                            </label>
                            <input id="zone-name" required
                                type="text"
                                placeholder="分区名称"
                                on:input=move |ev| name.set(event_target_value(&ev))
                                prop:value=name
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="zone-description">
                                <span class="label-text">"描述"</span>
                            </label>
                            <input id="zone-description"
                                type="text"
                                placeholder="描述"
                                on:input=move |ev| description.set(event_target_value(&ev))
                                prop:value=description
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="flex justify-end gap-2">
                            <Show when=move || editing.get().is_some()>
                                <button type="button" class="btn btn-ghost" on:click=move |_| reset_form()>
                                    "取消"
                                </button>
                            </Show>
                            <button type="submit" class="btn btn-primary">
                                {move || if editing.get().is_some() { "更新分区" } else { "创建分区" }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>

            // 分区列表
            <div class="card bg-base-100 shadow-md">
                <div class="card-body p-0">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"分区"</th>
                                <th>"描述"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || zones.with(|z| z.is_empty()) && !loading.get()>
                                <tr>
                                    <td colspan="3" class="text-center py-8 text-base-content/50">
                                        "该项目还没有分区。"
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || loading.get() && zones.with(|z| z.is_empty())>
                                <tr>
                                    <td colspan="3" class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span> " 加载中..."
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || zones.get()
                                key=|z| z.id.clone()
                                children=move |zone| {
                                    let delete_id = zone.id.clone();
                                    let edit_target = zone.clone();
                                    view! {
                                        <tr>
                                            <td class="font-medium text-sm">{zone.name.clone()}</td>
                                            <td class="text-xs text-base-content/60">{zone.description.clone()}</td>
                                            <td>
                                                <div class="flex gap-1 justify-end">
                                                    <button class="btn btn-ghost btn-sm gap-1" on:click=move |_| handle_edit(edit_target.clone())>
                                                        <Pencil attr:class="h-4 w-4" /> "编辑"
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
    }
}
