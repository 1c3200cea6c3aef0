use evalboard::SessionStatus;

use super::*;

fn profile(role: Role) -> UserProfile {
    UserProfile {
        id: "7".to_owned(),
        email: "ana@school.test".to_owned(),
        first_name: "Ana".to_owned(),
        last_name: "Pérez".to_owned(),
        role,
        department: None,
        is_active: true,
        employee_code: None,
        phone: None,
    }
}

fn authenticated(role: Role) -> AuthState {
    AuthState::from(SessionSnapshot {
        status: SessionStatus::Authenticated,
        profile: Some(profile(role)),
        initialized: true,
        login_pending: false,
        generation: 1,
    })
}

#[test]
fn default_state_is_loading_without_user() {
    let state = AuthState::default();
    assert!(state.loading());
    assert!(state.user().is_none());
    assert_eq!(state.display_name(), None);
}

#[test]
fn authenticated_state_exposes_name_and_role() {
    let state = authenticated(Role::Coordinator);
    assert!(!state.loading());
    assert_eq!(state.display_name().as_deref(), Some("Ana Pérez"));
    assert_eq!(state.role_label(), Some("Coordinator"));
}

#[test]
fn verifying_state_hides_cached_profile() {
    let mut state = authenticated(Role::Admin);
    state.session.status = SessionStatus::Verifying;
    assert!(state.user().is_none());
    assert_eq!(state.role_label(), None);
}

#[test]
fn role_labels_cover_every_role() {
    assert_eq!(role_label(Role::Admin), "Administrator");
    assert_eq!(role_label(Role::Teacher), "Teacher");
    assert_eq!(role_label(Role::Unrecognized), "Unknown role");
}
