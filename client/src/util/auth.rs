//! Session-to-UI plumbing.
//!
//! SYSTEM CONTEXT
//! ==============
//! The controller notifies plain callbacks; Leptos wants signals. This is
//! the single bridge between the two.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use evalboard::{Role, SessionController, SessionSnapshot, SubscriptionId};
use leptos::prelude::*;

use crate::state::auth::AuthState;

/// Mirror every controller state change into `auth`.
pub fn mirror_session(controller: &SessionController, auth: RwSignal<AuthState>) -> SubscriptionId {
    controller.subscribe(move |snapshot| auth.set(AuthState::from(snapshot.clone())))
}

/// Where the login page sends a user who is already signed in.
///
/// `None` while loading, when signed out, and for roles without a landing
/// page (those stay on the login form so they can sign in again).
pub fn signed_in_destination(snapshot: &SessionSnapshot) -> Option<&'static str> {
    if !snapshot.is_settled() {
        return None;
    }
    snapshot.role().and_then(Role::landing_path)
}
