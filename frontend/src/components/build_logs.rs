use crate::auth::use_auth;
use crate::components::icons::{Pencil, Plus, RefreshCw, Trash2};
use crate::web::{FetchGuard, confirm, format_display, now_iso, today_iso};
use leptos::prelude::*;
use leptos::task::spawn_local;
use sitetrack_shared::protocol::BuildLogDraft;
use sitetrack_shared::{BuildLog, PipelineDetail, Zone};

/// 日志表单状态
///
/// 将零散的 signal 整合为一个结构体，负责数据的持有、重置、
/// 校验，以及到请求对象的转换。`RwSignal` 实现了 `Copy`，
/// 适合在闭包间传递。
#[derive(Clone, Copy)]
struct LogFormState {
    site: RwSignal<String>,
    description: RwSignal<String>,
    notes: RwSignal<String>,
    total_length: RwSignal<String>,
    road_restoration: RwSignal<String>,
    hsc_chambers: RwSignal<String>,
    manholes: RwSignal<String>,
    date: RwSignal<String>,
    pipeline_details: RwSignal<Vec<PipelineDetail>>,
    // 待添加的管线明细行
    detail_length: RwSignal<String>,
    detail_material: RwSignal<String>,
}

impl LogFormState {
    fn new() -> Self {
        Self {
            site: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            notes: RwSignal::new(String::new()),
            total_length: RwSignal::new("0".to_string()),
            road_restoration: RwSignal::new("0".to_string()),
            hsc_chambers: RwSignal::new("0".to_string()),
            manholes: RwSignal::new("0".to_string()),
            date: RwSignal::new(today_iso()),
            pipeline_details: RwSignal::new(Vec::new()),
            detail_length: RwSignal::new("0".to_string()),
            detail_material: RwSignal::new(String::new()),
        }
    }

    fn reset(&self) {
        self.site.set(String::new());
        self.description.set(String::new());
        self.notes.set(String::new());
        self.total_length.set("0".to_string());
        self.road_restoration.set("0".to_string());
        self.hsc_chambers.set("0".to_string());
        self.manholes.set("0".to_string());
        self.date.set(today_iso());
        self.pipeline_details.set(Vec::new());
        self.detail_length.set("0".to_string());
        self.detail_material.set(String::new());
    }

    fn load(&self, log: &BuildLog) {
        self.site.set(log.site.clone());
        self.description.set(log.description.clone());
        self.notes.set(log.notes.clone());
        self.total_length.set(log.total_length.to_string());
        self.road_restoration.set(log.road_restoration.to_string());
        self.hsc_chambers.set(log.hsc_chambers.to_string());
        self.manholes.set(log.manholes.to_string());
        self.date.set(log.date.chars().take(10).collect());
        self.pipeline_details.set(log.pipeline_details.clone());
    }

    /// 校验表单，返回第一条错误
    fn validate(&self) -> Result<(), String> {
        if self.site.get_untracked().trim().is_empty() {
            return Err("请填写施工地点".to_string());
        }
        if self.description.get_untracked().trim().is_empty() {
            return Err("请填写施工内容".to_string());
        }
        let total_length: f64 = self.total_length.get_untracked().parse().unwrap_or(-1.0);
        if total_length <= 0.0 {
            return Err("铺设总长度必须大于 0".to_string());
        }
        let road: f64 = self.road_restoration.get_untracked().parse().unwrap_or(-1.0);
        if road < 0.0 {
            return Err("路面修复量不能为负".to_string());
        }
        if self.hsc_chambers.get_untracked().parse::<u32>().is_err() {
            return Err("HSC 井室数必须是非负整数".to_string());
        }
        if self.manholes.get_untracked().parse::<u32>().is_err() {
            return Err("检查井数必须是非负整数".to_string());
        }
        if self.date.get_untracked().is_empty() {
            return Err("请选择日志日期".to_string());
        }
        Ok(())
    }

    /// 转换为请求对象（调用前必须先通过校验）
    fn to_draft(
        &self,
        project_id: String,
        zone_id: Option<String>,
        created_at: String,
    ) -> BuildLogDraft {
        BuildLogDraft {
            project_id,
            zone_id,
            site: self.site.get_untracked(),
            description: self.description.get_untracked(),
            notes: self.notes.get_untracked(),
            total_length: self.total_length.get_untracked().parse().unwrap_or_default(),
            road_restoration: self
                .road_restoration
                .get_untracked()
                .parse()
                .unwrap_or_default(),
            hsc_chambers: self.hsc_chambers.get_untracked().parse().unwrap_or_default(),
            manholes: self.manholes.get_untracked().parse().unwrap_or_default(),
            pipeline_details: self.pipeline_details.get_untracked(),
            date: self.date.get_untracked(),
            created_at,
            updated_at: now_iso(),
        }
    }

    fn push_detail(&self) {
        let length: f64 = self.detail_length.get_untracked().parse().unwrap_or(0.0);
        let material = self.detail_material.get_untracked();
        if length <= 0.0 || material.trim().is_empty() {
            return;
        }
        self.pipeline_details
            .update(|details| details.push(PipelineDetail { length, material }));
        self.detail_length.set("0".to_string());
        self.detail_material.set(String::new());
    }
}

/// 施工日志页，可从项目或分区进入
///
/// 拉取策略按角色决定：管理员直接看项目全量日志；其他角色先取
/// 自己的分配，0 个分区走项目接口、1 个走分区接口、多个走
/// multi-zone 接口。新增 / 编辑 / 删除入口只对
/// admin / supervisor / foreman 开放。
#[component]
pub fn BuildLogsPage(project_id: Option<String>, zone_id: Option<String>) -> impl IntoView {
    let auth_ctx = use_auth();
    let auth_state = auth_ctx.state;

    let zone_route = StoredValue::new(zone_id);
    let project = RwSignal::new(project_id);

    let (zones, set_zones) = signal(Vec::<Zone>::new());
    let (logs, set_logs) = signal(Vec::<BuildLog>::new());
    let (loading, set_loading) = signal(false);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);
    let (form_open, set_form_open) = signal(false);
    let (editing, set_editing) = signal(Option::<BuildLog>::None);
    let selected_zone = RwSignal::new(String::new());
    let form = LogFormState::new();

    let logs_guard = StoredValue::new(FetchGuard::new());
    let zones_guard = StoredValue::new(FetchGuard::new());

    // 页面卸载后，仍在途的响应一律作废
    on_cleanup({
        let logs_guard = logs_guard.get_value();
        let zones_guard = zones_guard.get_value();
        move || {
            logs_guard.invalidate();
            zones_guard.invalidate();
        }
    });

    // 分区入口：先解析所属项目
    Effect::new(move |_| {
        let state = auth_state.get();
        if state.is_loading {
            return;
        }
        let Some(zone_id) = zone_route.get_value() else {
            return;
        };
        if project.get_untracked().is_some() {
            return;
        }
        let Some(api) = state.api() else { return };
        spawn_local(async move {
            match api.get_zone(&zone_id).await {
                Ok(zone) => project.set(Some(zone.project_id)),
                Err(e) => set_notification.set(Some((e, true))),
            }
        });
    });

    // 项目确定后拉取分区（用于表单的分区选择）
    Effect::new(move |_| {
        let Some(project_id) = project.get() else {
            return;
        };
        let state = auth_state.get();
        if state.is_loading {
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

    let fetch_logs = move || {
        let state = auth_state.get_untracked();
        let Some(api) = state.api() else { return };
        let Some(session) = state.session else {
            return;
        };
        let Some(project_id) = project.get_untracked() else {
            return;
        };
        let guard = logs_guard.get_value();
        let issue = guard.begin();
        set_loading.set(true);

        spawn_local(async move {
            let result = if session.role.is_admin() {
                api.get_build_logs_for_project(&project_id).await
            } else {
                // 非管理员按自己的分配决定可见范围
                match api.get_assignments_for_user(&session.user_id).await {
                    Ok(assignments) => {
                        let assigned_zones: Vec<String> = assignments
                            .iter()
                            .filter(|a| a.project_id == project_id)
                            .filter_map(|a| a.zone_id.clone())
                            .collect();

                        match assigned_zones.len() {
                            0 => api.get_build_logs_for_project(&project_id).await,
                            1 => api.get_build_logs_for_zone(&assigned_zones[0]).await,
                            _ => api.get_build_logs_multi_zone(assigned_zones).await,
                        }
                    }
                    Err(e) => Err(e),
                }
            };

            if !guard.is_current(issue) {
                return;
            }
            match result {
                Ok(list) => set_logs.set(list),
                Err(e) => set_notification.set(Some((e, true))),
            }
            set_loading.set(false);
        });
    };

    // 项目与会话就绪后加载日志
    Effect::new(move |_| {
        let state = auth_state.get();
        if state.is_loading || state.session.is_none() {
            return;
        }
        if project.get().is_none() {
            return;
        }
        fetch_logs();
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

    let can_edit = move || auth_state.get().role().can_edit_logs();

    let close_form = move || {
        form.reset();
        selected_zone.set(String::new());
        set_editing.set(None);
        set_form_open.set(false);
    };

    let handle_edit = move |log: BuildLog| {
        form.load(&log);
        selected_zone.set(log.zone_id.clone().unwrap_or_default());
        set_editing.set(Some(log));
        set_form_open.set(true);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        let Some(project_id) = project.get_untracked() else {
            return;
        };

        if let Err(msg) = form.validate() {
            set_notification.set(Some((msg, true)));
            return;
        }
        let has_zones = !zones.with_untracked(|z| z.is_empty());
        let zone_choice = selected_zone.get_untracked();
        if has_zones && zone_choice.is_empty() {
            set_notification.set(Some(("请选择分区".to_string(), true)));
            return;
        }

        let editing_log = editing.get_untracked();
        let created_at = editing_log
            .as_ref()
            .map(|log| log.created_at.clone())
            .unwrap_or_else(now_iso);
        let draft = form.to_draft(
            project_id,
            if has_zones { Some(zone_choice) } else { None },
            created_at,
        );

        spawn_local(async move {
            let result = match &editing_log {
                Some(log) => api.update_build_log(&log.id, &draft).await,
                None => api.create_build_log(&draft).await,
            };
            match result {
                Ok(()) => {
                    set_notification.set(Some((
                        if editing_log.is_some() {
                            "日志已更新".to_string()
                        } else {
                            "日志已创建".to_string()
                        },
                        false,
                    )));
                    close_form();
                    fetch_logs();
                }
                Err(e) => set_notification.set(Some((e, true))),
            }
        });
    };

    let handle_delete = move |id: String| {
        if !confirm("确定要删除这条日志吗？") {
            return;
        }
        let Some(api) = auth_state.get_untracked().api() else {
            return;
        };
        spawn_local(async move {
            match api.delete_build_log(&id).await {
                Ok(()) => {
                    set_notification.set(Some(("日志已删除".to_string(), false)));
                    fetch_logs();
                }
                Err(e) => set_notification.set(Some((e, true))),
            }
        });
    };

    let zone_label = move |zone_id: &Option<String>| -> String {
        match zone_id {
            None => "项目级".to_string(),
            Some(id) => zones
                .get()
                .iter()
                .find(|z| &z.id == id)
                .map(|z| z.name.clone())
                .unwrap_or_else(|| "未知分区".to_string()),
        }
    };

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
                <h1 class="text-2xl font-bold">"施工日志"</h1>
                <div class="flex gap-2">
                    <Show when=can_edit>
                        <button class="btn btn-primary btn-sm gap-1" on:click=move |_| set_form_open.update(|v| *v = !*v)>
                            <Plus attr:class="h-4 w-4" /> "新增日志"
                        </button>
                    </Show>
                    <button
                        class="btn btn-ghost btn-circle btn-sm"
                        disabled=move || loading.get()
                        on:click=move |_| fetch_logs()
                    >
                        <RefreshCw attr:class=move || if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                    </button>
                </div>
            </div>

            // 新建 / 编辑表单
            <Show when=move || form_open.get() && can_edit()>
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h2 class="card-title text-lg">
                            {move || if editing.get().is_some() { "编辑日志" } else { "新增日志" }}
                        </h2>
                        <form on:submit=on_submit class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                            <div class="form-control">
                                <label class="label"><span class="label-text">"施工地点"</span></label>
                                <input type="text" required placeholder="KM 4+200"
                                    on:input=move |ev| form.site.set(event_target_value(&ev))
                                    prop:value=form.site
                                    class="input input-bordered w-full" />
                            </div>

                            <div class="form-control">
                                <label class="label"><span class="label-text">"日志日期"</span></label>
                                <input type="date" required
                                    on:input=move |ev| form.date.set(event_target_value(&ev))
                                    prop:value=form.date
                                    class="input input-bordered w-full" />
                            </div>

                            <Show when=move || !zones.with(|z| z.is_empty())>
                                <div class="form-control">
                                    <label class="label"><span class="label-text">"所属分区"</span></label>
                                    <select
                                        class="select select-bordered w-full"
                                        on:change=move |ev| selected_zone.set(event_target_value(&ev))
                                        prop:value=selected_zone
                                    >
                                        <option value="" selected=move || selected_zone.get().is_empty()>"选择分区"</option>
                                        <For
                                            each=move || zones.get()
                                            key=|z| z.id.clone()
                                            children=move |zone| {
                                                view! { <option value=zone.id.clone()>{zone.name.clone()}</option> }
                                            }
                                        />
                                    </select>
                                </div>
                            </Show>

                            <div class="form-control sm:col-span-2">
                                <label class="label"><span class="label-text">"施工内容"</span></label>
                                <textarea required rows="2" placeholder="施工内容"
                                    on:input=move |ev| form.description.set(event_target_value(&ev))
                                    prop:value=form.description
                                    class="textarea textarea-bordered w-full"></textarea>
                            </div>

                            <div class="form-control sm:col-span-2">
                                <label class="label"><span class="label-text">"备注"</span></label>
                                <textarea rows="2" placeholder="备注（可选）"
                                    on:input=move |ev| form.notes.set(event_target_value(&ev))
                                    prop:value=form.notes
                                    class="textarea textarea-bordered w-full"></textarea>
                            </div>

                            <div class="form-control">
                                <label class="label"><span class="label-text">"铺设总长度 (m)"</span></label>
                                <input type="number" min="0" step="0.1" required
                                    on:input=move |ev| form.total_length.set(event_target_value(&ev))
                                    prop:value=form.total_length
                                    class="input input-bordered w-full" />
                            </div>

                            <div class="form-control">
                                <label class="label"><span class="label-text">"路面修复 (m²)"</span></label>
                                <input type="number" min="0" step="0.1"
                                    on:input=move |ev| form.road_restoration.set(event_target_value(&ev))
                                    prop:value=form.road_restoration
                                    class="input input-bordered w-full" />
                            </div>

                            <div class="form-control">
                                <label class="label"><span class="label-text">"HSC 井室"</span></label>
                                <input type="number" min="0"
                                    on:input=move |ev| form.hsc_chambers.set(event_target_value(&ev))
                                    prop:value=form.hsc_chambers
                                    class="input input-bordered w-full" />
                            </div>

                            <div class="form-control">
                                <label class="label"><span class="label-text">"检查井"</span></label>
                                <input type="number" min="0"
                                    on:input=move |ev| form.manholes.set(event_target_value(&ev))
                                    prop:value=form.manholes
                                    class="input input-bordered w-full" />
                            </div>

                            // 管线明细
                            <div class="sm:col-span-2 bg-base-200 p-4 rounded-lg space-y-2">
                                <span class="label-text font-bold">"管线明细"</span>
                                <div class="flex flex-wrap gap-1">
                                    <For
                                        each=move || Vec::from_iter(form.pipeline_details.get().into_iter().enumerate())
                                        key=|(i, _)| *i
                                        children=move |(index, detail)| {
                                            view! {
                                                <span class="badge badge-outline gap-1">
                                                    {format!("{} · {} m", detail.material, detail.length)}
                                                    <button type="button" class="text-error"
                                                        on:click=move |_| form.pipeline_details.update(|d| {
                                                            if index < d.len() {
                                                                d.remove(index);
                                                            }
                                                        })>
                                                        "✕"
                                                    </button>
                                                </span>
                                            }
                                        }
                                    />
                                </div>
                                <div class="join">
                                    <input type="text" placeholder="材质 (如 PVC DN200)"
                                        on:input=move |ev| form.detail_material.set(event_target_value(&ev))
                                        prop:value=form.detail_material
                                        class="input input-bordered input-sm join-item" />
                                    <input type="number" min="0" step="0.1" placeholder="长度"
                                        on:input=move |ev| form.detail_length.set(event_target_value(&ev))
                                        prop:value=form.detail_length
                                        class="input input-bordered input-sm join-item w-24" />
                                    <button type="button" class="btn btn-sm join-item" on:click=move |_| form.push_detail()>
                                        "添加"
                                    </button>
                                </div>
                            </div>

                            <div class="sm:col-span-2 flex justify-end gap-2">
                                <button type="button" class="btn btn-ghost" on:click=move |_| close_form()>
                                    "取消"
                                </button>
                                <button type="submit" class="btn btn-primary">
                                    {move || if editing.get().is_some() { "更新日志" } else { "保存日志" }}
                                </button>
                            </div>
                        </form>
                    </div>
                </div>
            </Show>

            // 日志列表
            <div class="card bg-base-100 shadow-md">
                <div class="card-body p-0">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"日期"</th>
                                    <th>"地点"</th>
                                    <th class="hidden md:table-cell">"范围"</th>
                                    <th>"总长度"</th>
                                    <th class="hidden md:table-cell">"井室 / 检查井"</th>
                                    <th class="hidden lg:table-cell">"管线明细"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || logs.with(|l| l.is_empty()) && !loading.get()>
                                    <tr>
                                        <td colspan="7" class="text-center py-8 text-base-content/50">
                                            "暂无施工日志。"
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || loading.get() && logs.with(|l| l.is_empty())>
                                    <tr>
                                        <td colspan="7" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span> " 加载中..."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || logs.get()
                                    key=|log| log.id.clone()
                                    children=move |log| {
                                        let delete_id = log.id.clone();
                                        let edit_target = log.clone();
                                        view! {
                                            <tr>
                                                <td class="text-xs">{format_display(&log.date)}</td>
                                                <td>
                                                    <div class="flex flex-col">
                                                        <span class="font-medium text-sm">{log.site.clone()}</span>
                                                        <span class="text-xs text-base-content/50">{log.description.clone()}</span>
                                                    </div>
                                                </td>
                                                <td class="hidden md:table-cell text-xs">{zone_label(&log.zone_id)}</td>
                                                <td class="text-sm">{format!("{} m", log.total_length)}</td>
                                                <td class="hidden md:table-cell text-xs">
                                                    {format!("{} / {}", log.hsc_chambers, log.manholes)}
                                                </td>
                                                <td class="hidden lg:table-cell">
                                                    <div class="flex flex-wrap gap-1">
                                                        {log.pipeline_details
                                                            .iter()
                                                            .map(|d| view! {
                                                                <span class="badge badge-ghost badge-sm">
                                                                    {format!("{} · {} m", d.material, d.length)}
                                                                </span>
                                                            })
                                                            .collect_view()}
                                                    </div>
                                                </td>
                                                <td>
                                                    {move || {
                                                        if !can_edit() {
                                                            return None;
                                                        }
                                                        let edit_target = edit_target.clone();
                                                        let delete_id = delete_id.clone();
                                                        Some(view! {
                                                            <div class="flex gap-1 justify-end">
                                                                <button class="btn btn-ghost btn-sm gap-1" on:click=move |_| handle_edit(edit_target.clone())>
                                                                    <Pencil attr:class="h-4 w-4" /> "编辑"
                                                                </button>
                                                                <button class="btn btn-ghost btn-sm text-error gap-1" on:click=move |_| handle_delete(delete_id.clone())>
                                                                    <Trash2 attr:class="h-4 w-4" /> "删除"
                                                                </button>
                                                            </div>
                                                        })
                                                    }}
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
