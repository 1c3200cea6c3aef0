use super::*;

// =============================================================================
// Role decoding
// =============================================================================

#[test]
fn role_decodes_english_names() {
    let roles: Vec<Role> = serde_json::from_str(r#"["admin","coordinator","teacher"]"#).unwrap();
    assert_eq!(roles, vec![Role::Admin, Role::Coordinator, Role::Teacher]);
}

#[test]
fn role_decodes_service_spellings() {
    let roles: Vec<Role> = serde_json::from_str(r#"["coordinador","maestro"]"#).unwrap();
    assert_eq!(roles, vec![Role::Coordinator, Role::Teacher]);
}

#[test]
fn role_unknown_value_is_unrecognized() {
    let role: Role = serde_json::from_str(r#""superuser""#).unwrap();
    assert_eq!(role, Role::Unrecognized);
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Coordinator).unwrap(), r#""coordinator""#);
}

#[test]
fn role_from_str_accepts_aliases_case_insensitively() {
    assert_eq!("Maestro".parse::<Role>(), Ok(Role::Teacher));
    assert_eq!(" ADMIN ".parse::<Role>(), Ok(Role::Admin));
    assert!("root".parse::<Role>().is_err());
}

#[test]
fn landing_paths_cover_known_roles_only() {
    assert_eq!(Role::Admin.landing_path(), Some("/admin/dashboard"));
    assert_eq!(Role::Coordinator.landing_path(), Some("/coordinator/dashboard"));
    assert_eq!(Role::Teacher.landing_path(), Some("/teacher/dashboard"));
    assert_eq!(Role::Unrecognized.landing_path(), None);
}

// =============================================================================
// UserProfile
// =============================================================================

#[test]
fn profile_decodes_login_user_payload() {
    let json = r#"{
        "id": "8c1f",
        "email": "ana@prepa.mx",
        "first_name": "Ana",
        "last_name": "Ruiz",
        "role": "maestro",
        "department": null
    }"#;
    let profile: UserProfile = serde_json::from_str(json).unwrap();
    assert_eq!(profile.id, "8c1f");
    assert_eq!(profile.role, Role::Teacher);
    assert!(profile.is_active);
    assert_eq!(profile.department, None);
}

#[test]
fn profile_accepts_numeric_id() {
    let json = r#"{"id": 42, "email": "a@x.com", "role": "admin"}"#;
    let profile: UserProfile = serde_json::from_str(json).unwrap();
    assert_eq!(profile.id, "42");
}

#[test]
fn profile_rejects_object_id() {
    let json = r#"{"id": {"v": 1}, "email": "a@x.com", "role": "admin"}"#;
    assert!(serde_json::from_str::<UserProfile>(json).is_err());
}

#[test]
fn profile_ignores_extra_me_fields() {
    let json = r#"{
        "id": "u1", "email": "a@x.com", "first_name": "A", "last_name": "B",
        "role": "admin", "is_active": false, "last_login": null,
        "created_at": "2024-01-01T00:00:00", "employee_code": "EMP1"
    }"#;
    let profile: UserProfile = serde_json::from_str(json).unwrap();
    assert!(!profile.is_active);
    assert_eq!(profile.employee_code.as_deref(), Some("EMP1"));
}

#[test]
fn display_name_joins_names() {
    let profile: UserProfile =
        serde_json::from_str(r#"{"id":"1","email":"a@x.com","first_name":" Ana ","last_name":"Ruiz","role":"admin"}"#)
            .unwrap();
    assert_eq!(profile.display_name(), "Ana Ruiz");
}

#[test]
fn display_name_falls_back_to_email() {
    let profile: UserProfile = serde_json::from_str(r#"{"id":"1","email":"a@x.com","role":"admin"}"#).unwrap();
    assert_eq!(profile.display_name(), "a@x.com");
}

// =============================================================================
// Auth payloads
// =============================================================================

#[test]
fn login_response_accepts_token_metadata() {
    let json = r#"{
        "access_token": "T", "token_type": "bearer", "expires_in": 28800,
        "user": {"id": "1", "email": "a@x.com", "role": "admin"}
    }"#;
    let resp: LoginResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.access_token, "T");
    assert_eq!(resp.expires_in, Some(28800));
    assert_eq!(resp.user.role, Role::Admin);
}

#[test]
fn password_change_serializes_service_field_names() {
    let body = PasswordChange { current_password: "old", new_password: "newpass" };
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(value, serde_json::json!({"current_password": "old", "new_password": "newpass"}));
}
