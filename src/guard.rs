//! Role-based route gating.
//!
//! A guard never looks at the network. It maps a [`SessionSnapshot`] and an
//! [`Access`] requirement to one of three outcomes, and keeps "still
//! loading" distinct from both allow and redirect so a protected screen
//! never flashes the login page during startup.
//!
//! Role checks are exact membership. Admins get coordinator screens only
//! because those regions list admin explicitly.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::session::SessionSnapshot;
use crate::types::Role;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const PROFILE_PATH: &str = "/profile";

// =============================================================================
// ACCESS
// =============================================================================

/// Role requirement for a protected region. Both fields must be satisfied
/// when both are set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Access {
    pub role: Option<Role>,
    pub roles: Option<Vec<Role>>,
}

impl Access {
    /// Any signed-in user.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn role(role: Role) -> Self {
        Self { role: Some(role), roles: None }
    }

    #[must_use]
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self { role: None, roles: Some(roles.into_iter().collect()) }
    }

    #[must_use]
    pub fn permits(&self, role: Role) -> bool {
        self.role.is_none_or(|required| required == role)
            && self.roles.as_ref().is_none_or(|allowed| allowed.contains(&role))
    }
}

/// Protected region a path belongs to, or `None` for public paths.
#[must_use]
pub fn access_for_path(path: &str) -> Option<Access> {
    let path = normalize(path);
    let under = |prefix: &str| path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'));

    if under("/admin") {
        Some(Access::role(Role::Admin))
    } else if under("/coordinator") {
        Some(Access::any_of([Role::Admin, Role::Coordinator]))
    } else if under("/teacher") {
        Some(Access::role(Role::Teacher))
    } else if path == HOME_PATH || path == PROFILE_PATH {
        Some(Access::authenticated())
    } else {
        None
    }
}

fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() { HOME_PATH } else { trimmed }
}

// =============================================================================
// DECISION
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Initialization or a login is still pending; render a placeholder.
    Loading,
    Allow,
    RedirectTo(String),
}

impl GuardDecision {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::RedirectTo(path) => Some(path),
            Self::Loading | Self::Allow => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteGuard {
    login_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(LOGIN_PATH)
    }
}

impl RouteGuard {
    #[must_use]
    pub fn new(login_path: impl Into<String>) -> Self {
        Self { login_path: login_path.into() }
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide whether the region described by `access` may render.
    #[must_use]
    pub fn check(&self, snapshot: &SessionSnapshot, access: &Access) -> GuardDecision {
        let role = match self.settled_role(snapshot) {
            Ok(role) => role,
            Err(decision) => return decision,
        };
        if access.permits(role) { GuardDecision::Allow } else { self.landing(role) }
    }

    /// Where `/` sends the user: their role's landing path.
    #[must_use]
    pub fn home(&self, snapshot: &SessionSnapshot) -> GuardDecision {
        match self.settled_role(snapshot) {
            Ok(role) => self.landing(role),
            Err(decision) => decision,
        }
    }

    /// Decision for a concrete path using the region table.
    #[must_use]
    pub fn check_path(&self, snapshot: &SessionSnapshot, path: &str) -> GuardDecision {
        if normalize(path) == HOME_PATH {
            return self.home(snapshot);
        }
        match access_for_path(path) {
            Some(access) => self.check(snapshot, &access),
            None => GuardDecision::Allow,
        }
    }

    fn settled_role(&self, snapshot: &SessionSnapshot) -> Result<Role, GuardDecision> {
        if !snapshot.is_settled() {
            return Err(GuardDecision::Loading);
        }
        snapshot.role().ok_or_else(|| self.to_login())
    }

    fn landing(&self, role: Role) -> GuardDecision {
        match role.landing_path() {
            Some(path) => GuardDecision::RedirectTo(path.to_owned()),
            None => self.to_login(),
        }
    }

    fn to_login(&self) -> GuardDecision {
        GuardDecision::RedirectTo(self.login_path.clone())
    }
}
