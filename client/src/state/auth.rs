//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! A read-only mirror of the controller's `SessionSnapshot`, held in an
//! `RwSignal` so guards and user-aware components re-render on change.
//! Only `util::auth::mirror_session` writes it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use evalboard::{Role, SessionSnapshot, UserProfile};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: SessionSnapshot,
}

impl From<SessionSnapshot> for AuthState {
    fn from(session: SessionSnapshot) -> Self {
        Self { session }
    }
}

impl AuthState {
    /// Signed-in user, only while the session is authenticated.
    pub fn user(&self) -> Option<&UserProfile> {
        self.session.user()
    }

    /// Initialization or a login is still pending.
    pub fn loading(&self) -> bool {
        !self.session.is_settled()
    }

    pub fn display_name(&self) -> Option<String> {
        self.user().map(UserProfile::display_name)
    }

    pub fn role_label(&self) -> Option<&'static str> {
        self.session.role().map(role_label)
    }
}

/// Human label for a role badge.
pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Administrator",
        Role::Coordinator => "Coordinator",
        Role::Teacher => "Teacher",
        Role::Unrecognized => "Unknown role",
    }
}
