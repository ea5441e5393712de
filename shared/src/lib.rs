//! SiteTrack 共享层
//!
//! 前端与后端 REST 接口之间的公共语言：
//! - 领域模型（项目 / 分区 / 用户 / 分配 / 施工日志）
//! - 请求与响应 DTO（`protocol`）
//! - Bearer Token 声明解码（`session`）
//!
//! 所有类型按后端 JSON 的命名约定序列化（`_id`、camelCase 字段）。

use serde::{Deserialize, Serialize};

pub mod protocol;
pub mod session;

pub use session::{DecodeError, Session, decode_token};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 默认后端地址，可被浏览器存储中的覆盖值替换
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

// =========================================================
// 角色 (Role)
// =========================================================

/// 授权角色标签。
///
/// 仅用于界面层的功能门控；真正的访问控制由后端执行。
/// 任何无法识别的角色值一律降级为 `User`（最小权限），
/// 而不是作为反序列化错误拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Supervisor,
    Foreman,
    #[default]
    User,
}

impl Role {
    /// 从 Token 声明或接口返回的角色字符串映射角色。
    ///
    /// 全函数：未知输入返回 `User`。
    pub fn from_claim(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            "supervisor" => Role::Supervisor,
            "foreman" => Role::Foreman,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Foreman => "foreman",
            Role::User => "user",
        }
    }

    /// 用户管理与项目管理界面仅对管理员开放
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// 施工日志的新增 / 编辑 / 删除入口
    pub fn can_edit_logs(&self) -> bool {
        matches!(self, Role::Admin | Role::Supervisor | Role::Foreman)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from_claim(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// ISO 8601，按后端原样透传，展示时再格式化
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// 用户与项目的关联记录，`zone_id` 为空表示覆盖整个项目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDetail {
    pub length: f64,
    pub material: String,
}

/// 单日施工进度记录，挂在项目或分区之下
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLog {
    #[serde(rename = "_id")]
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub zone_id: Option<String>,
    pub site: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub total_length: f64,
    #[serde(default)]
    pub road_restoration: f64,
    #[serde(default)]
    pub hsc_chambers: u32,
    #[serde(default)]
    pub manholes: u32,
    #[serde(default)]
    pub pipeline_details: Vec<PipelineDetail>,
    /// 记录对应的施工日期 (YYYY-MM-DD)
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_mapping_is_total() {
        assert_eq!(Role::from_claim("admin"), Role::Admin);
        assert_eq!(Role::from_claim("supervisor"), Role::Supervisor);
        assert_eq!(Role::from_claim("foreman"), Role::Foreman);
        assert_eq!(Role::from_claim("user"), Role::User);
        // 未知值降级为最小权限，绝不失败
        assert_eq!(Role::from_claim("superuser"), Role::User);
        assert_eq!(Role::from_claim(""), Role::User);
        assert_eq!(Role::from_claim("ADMIN"), Role::User);
    }

    #[test]
    fn role_deserializes_unknown_as_user() {
        let role: Role = serde_json::from_str("\"manager\"").unwrap();
        assert_eq!(role, Role::User);
        let role: Role = serde_json::from_str("\"foreman\"").unwrap();
        assert_eq!(role, Role::Foreman);
    }

    #[test]
    fn log_edit_gate_matches_role_set() {
        assert!(Role::Admin.can_edit_logs());
        assert!(Role::Supervisor.can_edit_logs());
        assert!(Role::Foreman.can_edit_logs());
        assert!(!Role::User.can_edit_logs());

        assert!(Role::Admin.is_admin());
        assert!(!Role::Supervisor.is_admin());
    }

    #[test]
    fn project_parses_backend_wire_format() {
        let json = r#"{
            "_id": "p1",
            "name": "Riverside Mains",
            "description": "Sewer main replacement",
            "startDate": "2024-03-01T00:00:00.000Z",
            "endDate": "2024-09-30T00:00:00.000Z",
            "status": "active",
            "createdBy": "u1"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id, "p1");
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.created_by, "u1");
    }

    #[test]
    fn assignment_without_zone_is_project_wide() {
        let json = r#"{"_id":"a1","userId":"u1","projectId":"p1","role":"foreman"}"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.zone_id, None);
        assert_eq!(assignment.role, Role::Foreman);
    }

    #[test]
    fn build_log_defaults_missing_collections() {
        let json = r#"{"_id":"l1","projectId":"p1","site":"KM 4+200"}"#;
        let log: BuildLog = serde_json::from_str(json).unwrap();
        assert!(log.pipeline_details.is_empty());
        assert_eq!(log.total_length, 0.0);
        assert_eq!(log.zone_id, None);
    }
}
