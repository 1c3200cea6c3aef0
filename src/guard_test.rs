use super::*;
use crate::session::SessionStatus;
use crate::test_helpers::profile;

fn signed_in(role: Role) -> SessionSnapshot {
    SessionSnapshot {
        status: SessionStatus::Authenticated,
        profile: Some(profile(role)),
        initialized: true,
        login_pending: false,
        generation: 1,
    }
}

fn signed_out() -> SessionSnapshot {
    SessionSnapshot { status: SessionStatus::Unauthenticated, initialized: true, ..SessionSnapshot::default() }
}

fn redirect(path: &str) -> GuardDecision {
    GuardDecision::RedirectTo(path.to_owned())
}

// =============================================================================
// Access
// =============================================================================

#[test]
fn access_requires_both_constraints_when_both_set() {
    let access = Access { role: Some(Role::Admin), roles: Some(vec![Role::Coordinator]) };
    assert!(!access.permits(Role::Admin));
    assert!(!access.permits(Role::Coordinator));
}

#[test]
fn authenticated_access_permits_every_role() {
    let access = Access::authenticated();
    for role in [Role::Admin, Role::Coordinator, Role::Teacher, Role::Unrecognized] {
        assert!(access.permits(role));
    }
}

// =============================================================================
// check
// =============================================================================

#[test]
fn loading_until_initialized() {
    let snapshot = SessionSnapshot::default();
    assert_eq!(RouteGuard::default().check(&snapshot, &Access::role(Role::Admin)), GuardDecision::Loading);
}

#[test]
fn loading_while_login_is_pending() {
    let mut snapshot = signed_out();
    snapshot.login_pending = true;
    let decision = RouteGuard::default().check(&snapshot, &Access::authenticated());
    assert!(decision.is_loading());
    assert_eq!(decision.redirect_target(), None);
}

#[test]
fn unauthenticated_always_goes_to_login() {
    let guard = RouteGuard::default();
    for access in [Access::authenticated(), Access::role(Role::Admin), Access::any_of([Role::Teacher])] {
        assert_eq!(guard.check(&signed_out(), &access), redirect("/login"));
    }
}

#[test]
fn custom_login_path_is_used() {
    let guard = RouteGuard::new("/signin");
    assert_eq!(guard.login_path(), "/signin");
    assert_eq!(guard.check(&signed_out(), &Access::authenticated()), redirect("/signin"));
}

#[test]
fn matching_role_is_allowed() {
    let guard = RouteGuard::default();
    assert_eq!(guard.check(&signed_in(Role::Admin), &Access::role(Role::Admin)), GuardDecision::Allow);
    assert_eq!(
        guard.check(&signed_in(Role::Coordinator), &Access::any_of([Role::Admin, Role::Coordinator])),
        GuardDecision::Allow
    );
}

#[test]
fn teacher_on_admin_region_lands_on_teacher_dashboard() {
    let decision = RouteGuard::default().check(&signed_in(Role::Teacher), &Access::role(Role::Admin));
    assert_eq!(decision, redirect("/teacher/dashboard"));
}

#[test]
fn admin_is_not_implicitly_a_teacher() {
    let decision = RouteGuard::default().check(&signed_in(Role::Admin), &Access::role(Role::Teacher));
    assert_eq!(decision, redirect("/admin/dashboard"));
}

#[test]
fn coordinator_on_admin_region_lands_on_coordinator_dashboard() {
    let decision = RouteGuard::default().check(&signed_in(Role::Coordinator), &Access::role(Role::Admin));
    assert_eq!(decision.redirect_target(), Some("/coordinator/dashboard"));
}

#[test]
fn unrecognized_role_without_landing_goes_to_login() {
    let decision = RouteGuard::default().check(&signed_in(Role::Unrecognized), &Access::role(Role::Admin));
    assert_eq!(decision, redirect("/login"));
}

// =============================================================================
// home + path table
// =============================================================================

#[test]
fn home_sends_each_role_to_its_dashboard() {
    let guard = RouteGuard::default();
    assert_eq!(guard.home(&signed_in(Role::Admin)), redirect("/admin/dashboard"));
    assert_eq!(guard.home(&signed_in(Role::Coordinator)), redirect("/coordinator/dashboard"));
    assert_eq!(guard.home(&signed_in(Role::Teacher)), redirect("/teacher/dashboard"));
    assert_eq!(guard.home(&signed_in(Role::Unrecognized)), redirect("/login"));
    assert_eq!(guard.home(&signed_out()), redirect("/login"));
    assert_eq!(guard.home(&SessionSnapshot::default()), GuardDecision::Loading);
}

#[test]
fn region_table_matches_route_layout() {
    assert_eq!(access_for_path("/admin/users"), Some(Access::role(Role::Admin)));
    assert_eq!(access_for_path("/admin"), Some(Access::role(Role::Admin)));
    assert_eq!(
        access_for_path("/coordinator/evaluations?page=2"),
        Some(Access::any_of([Role::Admin, Role::Coordinator]))
    );
    assert_eq!(access_for_path("/teacher/dashboard/"), Some(Access::role(Role::Teacher)));
    assert_eq!(access_for_path("/profile"), Some(Access::authenticated()));
    assert_eq!(access_for_path(""), Some(Access::authenticated()));
    assert_eq!(access_for_path("/login"), None);
    assert_eq!(access_for_path("/administrator"), None);
    assert_eq!(access_for_path("/nowhere"), None);
}

#[test]
fn check_path_combines_table_and_home() {
    let guard = RouteGuard::default();
    let admin = signed_in(Role::Admin);
    assert_eq!(guard.check_path(&admin, "/coordinator/dashboard"), GuardDecision::Allow);
    assert_eq!(guard.check_path(&admin, "/teacher/evaluations"), redirect("/admin/dashboard"));
    assert_eq!(guard.check_path(&admin, "/"), redirect("/admin/dashboard"));
    assert_eq!(guard.check_path(&signed_out(), "/login"), GuardDecision::Allow);
    assert_eq!(guard.check_path(&signed_out(), "/profile"), redirect("/login"));
}
