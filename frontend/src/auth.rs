//! 认证模块
//!
//! 管理会话状态（Token + 解码出的用户身份），与路由系统解耦。
//! 路由服务通过注入的 Token 持有信号来检查访问许可。
//!
//! 不变式：`token` 与 `session` 的每次变更都发生在同一次信号
//! 更新里 —— 消费方要么看到完整的旧状态，要么看到完整的新状态，
//! 绝不会出现"新 Token 配旧角色"的中间态。

use leptos::prelude::*;
use sitetrack_shared::{DecodeError, Role, Session, decode_token};

use crate::api::SiteTrackApi;
use crate::web::LocalStorage;

/// Token 在浏览器存储中的唯一键，跨刷新存活，登出时删除
const STORAGE_TOKEN_KEY: &str = "sitetrack_token";

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 当前 Bearer Token（存在即可通过路由守卫，与解码结果无关）
    pub token: Option<String>,
    /// 由 Token 声明派生的会话（仅在解码成功后存在）
    pub session: Option<Session>,
    /// 启动时的声明解码是否尚未完成
    pub is_loading: bool,
}

impl AuthState {
    /// 基于当前 Token 构造 API 客户端
    pub fn api(&self) -> Option<SiteTrackApi> {
        self.token.as_ref().map(|t| SiteTrackApi::new(t.clone()))
    }

    /// 当前角色；无会话时按最小权限处理
    pub fn role(&self) -> Role {
        self.session.as_ref().map(|s| s.role).unwrap_or_default()
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文
    ///
    /// 同步读取已存储的 Token：路由守卫在声明解码之前就能看到
    /// Token 存在（守卫只关心存在性，见路由模块）。
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState {
            token: LocalStorage::get(STORAGE_TOKEN_KEY),
            session: None,
            is_loading: true,
        });
        Self { state, set_state }
    }

    /// 获取 Token 持有信号（用于路由服务注入）
    pub fn has_token_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().token.is_some())
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态：解码已存储的 Token
///
/// 解码失败视为隐式登出：清空存储与状态，应用以未登录状态
/// 继续运行（绝不因坏 Token 崩溃）。此时若用户已被守卫放进
/// 受保护页面，Token 清空会触发路由服务的强制登出重定向。
pub fn init_auth(ctx: &AuthContext) {
    let stored = ctx.state.get_untracked().token;

    match stored {
        Some(token) => match decode_token(&token) {
            Ok(session) => {
                ctx.set_state.update(|state| {
                    state.session = Some(session);
                    state.is_loading = false;
                });
            }
            Err(err) => {
                web_sys::console::warn_1(
                    &format!("[Auth] Stored token rejected ({}), signing out.", err).into(),
                );
                LocalStorage::delete(STORAGE_TOKEN_KEY);
                ctx.set_state.update(|state| {
                    state.token = None;
                    state.session = None;
                    state.is_loading = false;
                });
            }
        },
        None => {
            ctx.set_state.update(|state| state.is_loading = false);
        }
    }
}

/// 登录：持久化 Token 并派生会话
///
/// 解码失败时不安装任何会话，并回滚存储（不留下无会话的孤儿
/// Token），错误交由调用方展示。
pub fn login(ctx: &AuthContext, token: String) -> Result<Session, DecodeError> {
    LocalStorage::set(STORAGE_TOKEN_KEY, &token);

    match decode_token(&token) {
        Ok(session) => {
            let installed = session.clone();
            ctx.set_state.update(|state| {
                state.token = Some(token);
                state.session = Some(session);
                state.is_loading = false;
            });
            Ok(installed)
        }
        Err(err) => {
            LocalStorage::delete(STORAGE_TOKEN_KEY);
            Err(err)
        }
    }
}

/// 注销并清除状态（幂等，无会话时调用同样安全）
///
/// 导航由路由服务的 Token 监听自动处理，调用方无需手动跳转。
pub fn logout(ctx: &AuthContext) {
    LocalStorage::delete(STORAGE_TOKEN_KEY);
    ctx.set_state.update(|state| {
        state.token = None;
        state.session = None;
    });
}
