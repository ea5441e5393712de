//! 会话解码模块
//!
//! 把外部签发的 Bearer Token 解码为结构化会话（用户标识 + 角色）。
//!
//! 信任边界：这里只解析声明，**不校验签名** —— 签名校验与真正的
//! 访问控制始终由后端完成。客户端解出的角色仅用于界面门控
//! （显示或隐藏入口），不构成任何安全控制。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::Role;

// =========================================================
// 会话与错误类型
// =========================================================

/// 客户端会话，由当前 Token 的声明派生
///
/// 只要存在结构有效且带 subject 声明的 Token，会话就存在；
/// 反之亦然。`user_id` 永不为空。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// 用户标识，来自 subject 声明
    pub user_id: String,
    /// 展示用邮箱，声明中可能缺失
    pub email: Option<String>,
    /// 授权角色，缺失或无法识别时降级为 `user`
    pub role: Role,
}

/// Token 解码失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// 分段不足、声明段不是合法 Base64URL、或不是合法 JSON
    Malformed,
    /// 结构有效但缺少 subject 声明
    MissingSubject,
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::Malformed => write!(f, "token is not a decodable claims token"),
            DecodeError::MissingSubject => write!(f, "token claims are missing a subject"),
        }
    }
}

impl std::error::Error for DecodeError {}

// =========================================================
// 解码
// =========================================================

/// Token 中与本应用相关的声明子集
#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// 解码 Bearer Token 的声明段，派生会话。
///
/// 结构要求：至少两个以 `.` 分隔的段，第二段为 Base64URL 编码的
/// JSON 声明，且包含非空 `sub`。
pub fn decode_token(token: &str) -> Result<Session, DecodeError> {
    let mut segments = token.split('.');
    let _header = segments.next();
    let claims_segment = segments.next().ok_or(DecodeError::Malformed)?;

    let claims_bytes = URL_SAFE_NO_PAD
        .decode(claims_segment)
        .map_err(|_| DecodeError::Malformed)?;

    let claims: TokenClaims =
        serde_json::from_slice(&claims_bytes).map_err(|_| DecodeError::Malformed)?;

    let user_id = match claims.sub {
        Some(sub) if !sub.is_empty() => sub,
        _ => return Err(DecodeError::MissingSubject),
    };

    Ok(Session {
        user_id,
        email: claims.email,
        role: claims
            .role
            .as_deref()
            .map(Role::from_claim)
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a structurally valid token around the given claims JSON.
    fn token_with_claims(claims_json: &str) -> String {
        format!("header.{}.signature", URL_SAFE_NO_PAD.encode(claims_json))
    }

    #[test]
    fn rejects_tokens_with_fewer_than_two_segments() {
        assert_eq!(decode_token(""), Err(DecodeError::Malformed));
        assert_eq!(decode_token("justonesegment"), Err(DecodeError::Malformed));
        assert_eq!(decode_token("no-dots-here"), Err(DecodeError::Malformed));
    }

    #[test]
    fn rejects_undecodable_claims_segment() {
        assert_eq!(decode_token("head.!!!.sig"), Err(DecodeError::Malformed));
        // 合法 Base64 但不是 JSON
        let not_json = format!("head.{}.sig", URL_SAFE_NO_PAD.encode("plain text"));
        assert_eq!(decode_token(&not_json), Err(DecodeError::Malformed));
    }

    #[test]
    fn rejects_claims_without_subject() {
        let token = token_with_claims(r#"{"email":"a@b.c","role":"admin"}"#);
        assert_eq!(decode_token(&token), Err(DecodeError::MissingSubject));

        // JS falsy 语义：空字符串的 subject 同样视为缺失
        let token = token_with_claims(r#"{"sub":"","role":"admin"}"#);
        assert_eq!(decode_token(&token), Err(DecodeError::MissingSubject));
    }

    #[test]
    fn subject_is_copied_exactly() {
        let token = token_with_claims(r#"{"sub":"6602ab34cc9d","email":"f@site.example"}"#);
        let session = decode_token(&token).unwrap();
        assert_eq!(session.user_id, "6602ab34cc9d");
        assert_eq!(session.email.as_deref(), Some("f@site.example"));
    }

    #[test]
    fn role_defaults_to_user_when_absent_or_unknown() {
        let token = token_with_claims(r#"{"sub":"u1"}"#);
        assert_eq!(decode_token(&token).unwrap().role, Role::User);

        let token = token_with_claims(r#"{"sub":"u1","role":"owner"}"#);
        assert_eq!(decode_token(&token).unwrap().role, Role::User);
    }

    #[test]
    fn decodes_admin_token_scenario() {
        // 声明段解码为 {"sub":"u1","role":"admin"}
        let token = "x.eyJzdWIiOiJ1MSIsInJvbGUiOiJhZG1pbiJ9.sig";
        let session = decode_token(token).unwrap();
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.email, None);
    }
}
