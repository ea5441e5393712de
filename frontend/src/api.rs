//! REST 客户端模块
//!
//! 覆盖后端暴露的全部接口。所有已认证请求携带
//! `Authorization: Bearer <token>`；非 2xx 状态与传输失败统一
//! 转成人类可读的 `Err(String)`，由调用页面就地展示。

use gloo_net::http::Request;
use sitetrack_shared::protocol::{
    ApiErrorBody, BuildLogDraft, LoginRequest, LoginResponse, NewAssignment, NewUser,
    ProjectDraft, ZoneDraft, ZoneIdsRequest,
};
use sitetrack_shared::{
    Assignment, BEARER_PREFIX, BuildLog, DEFAULT_API_BASE_URL, HEADER_AUTHORIZATION, Project,
    UserAccount, Zone,
};

use crate::web::LocalStorage;

/// 后端地址覆盖值的存储键（配置项，通常不存在）
const STORAGE_API_URL_KEY: &str = "sitetrack_api_url";

/// 当前生效的后端地址
pub fn api_base_url() -> String {
    LocalStorage::get(STORAGE_API_URL_KEY).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

/// 登录：换取 Bearer Token
///
/// 唯一不带认证头的接口；失败时优先透出后端错误体中的 message。
pub async fn login(email: String, password: String) -> Result<LoginResponse, String> {
    let url = format!("{}/auth/login", api_base_url().trim_end_matches('/'));
    let body = LoginRequest { email, password };

    let res = Request::post(&url)
        .header("Content-Type", "application/json")
        .json(&body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !res.ok() {
        let status = res.status();
        let message = res
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|b| b.message);
        return Err(message.unwrap_or_else(|| format!("Login failed: {}", status)));
    }

    res.json::<LoginResponse>().await.map_err(|e| e.to_string())
}

/// 写请求方法
#[derive(Debug, Clone, Copy)]
enum WriteMethod {
    Post,
    Patch,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SiteTrackApi {
    base_url: String,
    token: String,
}

impl SiteTrackApi {
    pub fn new(token: String) -> Self {
        let base_url = api_base_url().trim_end_matches('/').to_string();
        Self { base_url, token }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // 认证头
    fn auth_value(&self) -> String {
        format!("{}{}", BEARER_PREFIX, self.token)
    }

    /// GET 并解析 JSON
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
    ) -> Result<T, String> {
        let res = Request::get(&self.url(path))
            .header(HEADER_AUTHORIZATION, &self.auth_value())
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.ok() {
            return Err(format!("{}失败: {}", what, res.status()));
        }

        res.json::<T>().await.map_err(|e| e.to_string())
    }

    /// 携带 JSON 体的写请求（POST / PATCH），忽略响应体
    async fn send_json<B: serde::Serialize>(
        &self,
        method: WriteMethod,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<(), String> {
        let url = self.url(path);
        let builder = match method {
            WriteMethod::Post => Request::post(&url),
            WriteMethod::Patch => Request::patch(&url),
        };

        let res = builder
            .header(HEADER_AUTHORIZATION, &self.auth_value())
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.ok() {
            return Err(format!("{}失败: {}", what, res.status()));
        }

        Ok(())
    }

    async fn delete(&self, path: &str, what: &str) -> Result<(), String> {
        let res = Request::delete(&self.url(path))
            .header(HEADER_AUTHORIZATION, &self.auth_value())
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.ok() {
            return Err(format!("{}失败: {}", what, res.status()));
        }

        Ok(())
    }

    // =========================================================
    // 项目 (Projects)
    // =========================================================

    /// 获取项目列表
    pub async fn get_projects(&self) -> Result<Vec<Project>, String> {
        self.get_json("/projects", "获取项目").await
    }

    /// 获取单个项目
    pub async fn get_project(&self, id: &str) -> Result<Project, String> {
        self.get_json(&format!("/projects/{}", id), "获取项目").await
    }

    /// 创建项目
    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<(), String> {
        self.send_json(WriteMethod::Post, "/projects", draft, "创建项目").await
    }

    /// 更新项目
    pub async fn update_project(&self, id: &str, draft: &ProjectDraft) -> Result<(), String> {
        self.send_json(WriteMethod::Patch, &format!("/projects/{}", id), draft, "更新项目")
            .await
    }

    /// 删除项目
    pub async fn delete_project(&self, id: &str) -> Result<(), String> {
        self.delete(&format!("/projects/{}", id), "删除项目").await
    }

    // =========================================================
    // 分区 (Zones)
    // =========================================================

    /// 获取项目下的分区列表
    pub async fn get_zones_for_project(&self, project_id: &str) -> Result<Vec<Zone>, String> {
        self.get_json(&format!("/zones/project/{}", project_id), "获取分区")
            .await
    }

    /// 获取单个分区
    pub async fn get_zone(&self, id: &str) -> Result<Zone, String> {
        self.get_json(&format!("/zones/{}", id), "获取分区").await
    }

    /// 创建分区
    pub async fn create_zone(&self, draft: &ZoneDraft) -> Result<(), String> {
        self.send_json(WriteMethod::Post, "/zones", draft, "创建分区").await
    }

    /// 更新分区
    pub async fn update_zone(&self, id: &str, draft: &ZoneDraft) -> Result<(), String> {
        self.send_json(WriteMethod::Patch, &format!("/zones/{}", id), draft, "更新分区")
            .await
    }

    /// 删除分区
    pub async fn delete_zone(&self, id: &str) -> Result<(), String> {
        self.delete(&format!("/zones/{}", id), "删除分区").await
    }

    // =========================================================
    // 用户 (Users)
    // =========================================================

    /// 获取用户列表
    pub async fn get_users(&self) -> Result<Vec<UserAccount>, String> {
        self.get_json("/users", "获取用户").await
    }

    /// 创建用户
    pub async fn create_user(&self, new_user: &NewUser) -> Result<(), String> {
        self.send_json(WriteMethod::Post, "/users", new_user, "创建用户").await
    }

    /// 删除用户
    pub async fn delete_user(&self, id: &str) -> Result<(), String> {
        self.delete(&format!("/users/{}", id), "删除用户").await
    }

    // =========================================================
    // 分配 (Assignments)
    // =========================================================

    /// 获取全部分配
    pub async fn get_assignments(&self) -> Result<Vec<Assignment>, String> {
        self.get_json("/assignments", "获取分配").await
    }

    /// 按用户过滤分配
    pub async fn get_assignments_for_user(&self, user_id: &str) -> Result<Vec<Assignment>, String> {
        self.get_json(&format!("/assignments/user/{}", user_id), "获取分配")
            .await
    }

    /// 按项目过滤分配
    pub async fn get_assignments_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<Assignment>, String> {
        self.get_json(&format!("/assignments/project/{}", project_id), "获取分配")
            .await
    }

    /// 按项目与分区过滤分配
    pub async fn get_assignments_for_project_zone(
        &self,
        project_id: &str,
        zone_id: &str,
    ) -> Result<Vec<Assignment>, String> {
        self.get_json(
            &format!("/assignments/project/{}/zone/{}", project_id, zone_id),
            "获取分配",
        )
        .await
    }

    /// 创建分配（zone 为空表示覆盖整个项目）
    pub async fn create_assignment(&self, assignment: &NewAssignment) -> Result<(), String> {
        self.send_json(WriteMethod::Post, "/assignments", assignment, "创建分配")
            .await
    }

    /// 删除分配
    ///
    /// 后端以 (projectId, userId) 作为删除键；同一用户在同一项目上
    /// 持有多条分配时由后端决定删除哪一条。
    pub async fn delete_assignment(&self, project_id: &str, user_id: &str) -> Result<(), String> {
        self.delete(
            &format!("/assignments/{}/{}", project_id, user_id),
            "删除分配",
        )
        .await
    }

    // =========================================================
    // 施工日志 (Build logs)
    // =========================================================

    /// 按项目获取施工日志
    pub async fn get_build_logs_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<BuildLog>, String> {
        self.get_json(&format!("/build-logs/project/{}", project_id), "获取日志")
            .await
    }

    /// 按分区获取施工日志
    pub async fn get_build_logs_for_zone(&self, zone_id: &str) -> Result<Vec<BuildLog>, String> {
        self.get_json(&format!("/build-logs/zone/{}", zone_id), "获取日志")
            .await
    }

    /// 跨多个分区获取施工日志（POST 语义的查询接口）
    pub async fn get_build_logs_multi_zone(
        &self,
        zone_ids: Vec<String>,
    ) -> Result<Vec<BuildLog>, String> {
        let body = ZoneIdsRequest { zone_ids };
        let res = Request::post(&self.url("/build-logs/multi-zone"))
            .header(HEADER_AUTHORIZATION, &self.auth_value())
            .header("Content-Type", "application/json")
            .json(&body)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.ok() {
            return Err(format!("获取日志失败: {}", res.status()));
        }

        res.json::<Vec<BuildLog>>().await.map_err(|e| e.to_string())
    }

    /// 创建施工日志
    pub async fn create_build_log(&self, draft: &BuildLogDraft) -> Result<(), String> {
        self.send_json(WriteMethod::Post, "/build-logs", draft, "创建日志").await
    }

    /// 更新施工日志
    pub async fn update_build_log(&self, id: &str, draft: &BuildLogDraft) -> Result<(), String> {
        self.send_json(WriteMethod::Patch, &format!("/build-logs/{}", id), draft, "更新日志")
            .await
    }

    /// 删除施工日志
    pub async fn delete_build_log(&self, id: &str) -> Result<(), String> {
        self.delete(&format!("/build-logs/{}", id), "删除日志").await
    }
}
