//! Request/response bodies for the REST API.
//!
//! Field names mirror the backend's JSON exactly (camelCase, `access_token`
//! from the auth endpoint); screens build these instead of ad-hoc maps.

use serde::{Deserialize, Serialize};

use crate::{PipelineDetail, ProjectStatus, Role};

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Error body the auth endpoint returns on a failed login.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// =========================================================
// Projects / Zones / Users
// =========================================================

/// Create/update payload for a project. The same shape serves POST and
/// PATCH, as the backend accepts the full document either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub status: ProjectStatus,
    pub created_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDraft {
    pub name: String,
    pub description: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: Role,
}

// =========================================================
// Assignments
// =========================================================

/// `zone_id: None` serializes as an explicit `null`, which the backend
/// reads as a project-wide assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub user_id: String,
    pub project_id: String,
    pub role: Role,
    pub zone_id: Option<String>,
}

// =========================================================
// Build logs
// =========================================================

/// Body of `POST /build-logs/multi-zone`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneIdsRequest {
    pub zone_ids: Vec<String>,
}

/// Create/update payload for a build log. `zone_id` is omitted entirely
/// (not null) when the project has no zones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLogDraft {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    pub site: String,
    pub description: String,
    pub notes: String,
    pub total_length: f64,
    pub road_restoration: f64,
    pub hsc_chambers: u32,
    pub manholes: u32,
    pub pipeline_details: Vec<PipelineDetail>,
    pub date: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_wide_assignment_serializes_null_zone() {
        let body = NewAssignment {
            user_id: "u1".into(),
            project_id: "p1".into(),
            role: Role::Foreman,
            zone_id: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["zoneId"], serde_json::Value::Null);
        assert_eq!(json["role"], "foreman");
    }

    #[test]
    fn multi_zone_body_uses_backend_field_name() {
        let body = ZoneIdsRequest {
            zone_ids: vec!["z1".into(), "z2".into()],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"zoneIds\""));
    }

    #[test]
    fn zoneless_log_draft_omits_zone_key() {
        let draft = BuildLogDraft {
            project_id: "p1".into(),
            zone_id: None,
            site: "KM 2+100".into(),
            description: "trenching".into(),
            notes: String::new(),
            total_length: 120.0,
            road_restoration: 0.0,
            hsc_chambers: 2,
            manholes: 1,
            pipeline_details: vec![],
            date: "2024-05-14".into(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert!(!json.contains("zoneId"));
        assert!(json.contains("\"totalLength\":120.0"));
    }
}
