//! Wire DTOs shared with the evaluation service.
//!
//! DESIGN
//! ======
//! Roles are a closed enum. The service historically spells them in Spanish
//! (`coordinador`, `maestro`), so both spellings decode; anything else lands
//! on `Role::Unrecognized` instead of failing the whole profile.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// ROLE
// =============================================================================

/// Platform role carried on the user profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(alias = "coordinador")]
    Coordinator,
    #[serde(alias = "maestro")]
    Teacher,
    /// A role the client has no screens for. Treated as needing re-login.
    #[serde(other)]
    Unrecognized,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Coordinator => "coordinator",
            Self::Teacher => "teacher",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Default screen for this role, or `None` when the role has no landing page.
    #[must_use]
    pub fn landing_path(self) -> Option<&'static str> {
        match self {
            Self::Admin => Some("/admin/dashboard"),
            Self::Coordinator => Some("/coordinator/dashboard"),
            Self::Teacher => Some("/teacher/dashboard"),
            Self::Unrecognized => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "coordinator" | "coordinador" => Ok(Self::Coordinator),
            "teacher" | "maestro" => Ok(Self::Teacher),
            _ => Err(UnknownRole(raw.to_owned())),
        }
    }
}

// =============================================================================
// USER PROFILE
// =============================================================================

/// Identity of the signed-in user as returned by `/auth/login` and `/auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier. Numeric ids are normalized to strings.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl UserProfile {
    /// `first last`, or the email when both names are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() { self.email.clone() } else { full.to_owned() }
    }
}

fn default_active() -> bool {
    true
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        _ => Err(D::Error::custom("expected string or number id")),
    }
}

// =============================================================================
// AUTH PAYLOADS
// =============================================================================

/// Successful `/auth/login` response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: UserProfile,
}

/// `/auth/verify-token` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCheck {
    pub valid: bool,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

/// `/auth/change-password` request body.
#[derive(Debug, Serialize)]
pub struct PasswordChange<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}
