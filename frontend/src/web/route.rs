//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义应用的所有路由、路由守卫规则，以及按角色计算登录后落地页。

use std::fmt::Display;

use sitetrack_shared::Role;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    SignIn,
    /// 中性入口：已认证用户按角色分流
    Redirect,
    /// 项目总览（所有角色的共享首页，内部按角色过滤）
    Home,
    /// 用户管理（仅管理员）
    AdminUsers,
    /// 项目管理（仅管理员）
    AdminProjects,
    /// 某个项目下的分区管理（仅管理员），参数为项目 id
    AdminZones(String),
    /// 分配管理（仅管理员）
    AdminAssignments,
    /// 按项目查看施工日志，参数为项目 id
    BuildLogsProject(String),
    /// 按分区查看施工日志，参数为分区 id
    BuildLogsZone(String),
    /// 个人资料
    Profile,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/signin" => return Self::SignIn,
            "/redirect" => return Self::Redirect,
            "/home" | "/projects" => return Self::Home,
            "/profile" => return Self::Profile,
            "/admin/users" => return Self::AdminUsers,
            "/admin/projects" => return Self::AdminProjects,
            "/admin/assignments" => return Self::AdminAssignments,
            _ => {}
        }

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["admin", "projects", project_id, "zones"] if !project_id.is_empty() => {
                Self::AdminZones((*project_id).to_string())
            }
            ["build-logs", "project", project_id] if !project_id.is_empty() => {
                Self::BuildLogsProject((*project_id).to_string())
            }
            ["build-logs", "zone", zone_id] if !zone_id.is_empty() => {
                Self::BuildLogsZone((*zone_id).to_string())
            }
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::SignIn => "/signin".to_string(),
            Self::Redirect => "/redirect".to_string(),
            Self::Home => "/home".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::AdminUsers => "/admin/users".to_string(),
            Self::AdminProjects => "/admin/projects".to_string(),
            Self::AdminAssignments => "/admin/assignments".to_string(),
            Self::AdminZones(project_id) => format!("/admin/projects/{}/zones", project_id),
            Self::BuildLogsProject(project_id) => format!("/build-logs/project/{}", project_id),
            Self::BuildLogsZone(zone_id) => format!("/build-logs/zone/{}", zone_id),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    ///
    /// 守卫只看 Token 是否存在，不关心声明能否解码；
    /// 解码失败由会话上下文单独处理（强制登出）。
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::SignIn | Self::NotFound)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::SignIn)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::SignIn
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 导航守卫判定：返回 `Some(目标)` 表示需要重定向，`None` 表示放行。
///
/// 与路由服务解耦成纯函数，导航、popstate 与认证变化三条路径
/// 共用同一套规则。
pub fn redirect_target(target: &AppRoute, has_token: bool) -> Option<AppRoute> {
    if target.requires_auth() && !has_token {
        return Some(AppRoute::auth_failure_redirect());
    }
    if target.should_redirect_when_authenticated() && has_token {
        return Some(AppRoute::auth_success_redirect());
    }
    None
}

/// 按角色计算登录后的落地路由。
///
/// 全函数：当前所有角色（含无法识别的值降级出的 `user`）都落在
/// 共享首页，由首页内部按角色过滤内容。
pub fn landing_for_role(role: Role) -> AppRoute {
    match role {
        Role::Admin => AppRoute::Home,
        Role::Supervisor => AppRoute::Home,
        Role::Foreman => AppRoute::Home,
        Role::User => AppRoute::Home,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_static_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::SignIn);
        assert_eq!(AppRoute::from_path("/signin"), AppRoute::SignIn);
        assert_eq!(AppRoute::from_path("/redirect"), AppRoute::Redirect);
        assert_eq!(AppRoute::from_path("/home"), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/projects"), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/admin/users"), AppRoute::AdminUsers);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn parses_parameterized_paths() {
        assert_eq!(
            AppRoute::from_path("/admin/projects/p42/zones"),
            AppRoute::AdminZones("p42".into())
        );
        assert_eq!(
            AppRoute::from_path("/build-logs/project/p42"),
            AppRoute::BuildLogsProject("p42".into())
        );
        assert_eq!(
            AppRoute::from_path("/build-logs/zone/z7"),
            AppRoute::BuildLogsZone("z7".into())
        );
        // 缺参数的变体不匹配
        assert_eq!(AppRoute::from_path("/build-logs/zone/"), AppRoute::NotFound);
    }

    #[test]
    fn paths_round_trip() {
        let routes = [
            AppRoute::Redirect,
            AppRoute::Home,
            AppRoute::Profile,
            AppRoute::AdminUsers,
            AppRoute::AdminProjects,
            AppRoute::AdminAssignments,
            AppRoute::AdminZones("p1".into()),
            AppRoute::BuildLogsProject("p1".into()),
            AppRoute::BuildLogsZone("z1".into()),
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn every_route_except_signin_and_404_requires_auth() {
        assert!(!AppRoute::SignIn.requires_auth());
        assert!(!AppRoute::NotFound.requires_auth());
        assert!(AppRoute::Home.requires_auth());
        assert!(AppRoute::Redirect.requires_auth());
        assert!(AppRoute::AdminUsers.requires_auth());
        assert!(AppRoute::BuildLogsZone("z1".into()).requires_auth());
    }

    #[test]
    fn missing_token_always_redirects_protected_paths_to_signin() {
        for route in [
            AppRoute::Home,
            AppRoute::Redirect,
            AppRoute::Profile,
            AppRoute::AdminProjects,
            AppRoute::AdminZones("p1".into()),
            AppRoute::BuildLogsProject("p1".into()),
        ] {
            assert_eq!(redirect_target(&route, false), Some(AppRoute::SignIn));
        }
    }

    #[test]
    fn token_presence_alone_admits_protected_paths() {
        // 守卫不看声明内容，只看 Token 是否存在
        assert_eq!(redirect_target(&AppRoute::Home, true), None);
        assert_eq!(
            redirect_target(&AppRoute::AdminUsers, true),
            None,
            "role checks are layered per screen, not in the guard"
        );
    }

    #[test]
    fn authenticated_user_leaves_signin() {
        assert_eq!(
            redirect_target(&AppRoute::SignIn, true),
            Some(AppRoute::Home)
        );
        assert_eq!(redirect_target(&AppRoute::SignIn, false), None);
    }

    #[test]
    fn landing_is_total_and_shared() {
        for role in [Role::Admin, Role::Supervisor, Role::Foreman, Role::User] {
            assert_eq!(landing_for_role(role), AppRoute::Home);
        }
        // 未知角色字符串经最小权限映射后同样有落地页
        assert_eq!(
            landing_for_role(Role::from_claim("something-else")),
            AppRoute::Home
        );
    }
}
