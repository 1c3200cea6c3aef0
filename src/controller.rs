//! Session controller: the one object consumers hold.
//!
//! DESIGN
//! ======
//! Built once per process from a transport and a store, then cloned into
//! whatever needs it (Leptos context, CLI command handlers). Clones share
//! the same [`SessionCore`], gateway and init cell.
//!
//! SYSTEM CONTEXT
//! ==============
//! ```text
//! consumer ──► SessionController ──► AuthGateway ──► Transport ──► service
//!                    │                    │ 401
//!                    ▼                    ▼
//!               SessionCore ◄──── forced invalidation
//!                    │
//!                    ▼
//!               SessionStore
//! ```
//!
//! ERROR HANDLING
//! ==============
//! `initialize` and `logout` never fail. `login` and `change_password`
//! return [`SessionError`], whose `Display` is the message for the form.
//! Other calls return the gateway's [`ApiError`] untouched.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::sync::Arc;

use serde::de::IgnoredAny;
use tokio::sync::OnceCell;

use crate::config::ApiConfig;
use crate::error::{ApiError, CHANGE_PASSWORD_FALLBACK_MESSAGE, LOGIN_FALLBACK_MESSAGE, SessionError};
use crate::gateway::{AuthGateway, decode};
use crate::guard::{Access, GuardDecision, RouteGuard};
use crate::session::{ClearReason, SessionCore, SessionSnapshot, SessionStatus, SubscriptionId};
use crate::store::SessionStore;
use crate::transport::{ApiRequest, Transport};
use crate::types::{LoginResponse, PasswordChange, TokenCheck, UserProfile};

pub const LOGIN_PATH: &str = "/auth/login";
pub const ME_PATH: &str = "/auth/me";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const CHANGE_PASSWORD_PATH: &str = "/auth/change-password";
pub const VERIFY_TOKEN_PATH: &str = "/auth/verify-token";

/// Minimum length the service accepts for a new password.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone)]
pub struct SessionController {
    core: Arc<SessionCore>,
    gateway: AuthGateway,
    init: Arc<OnceCell<()>>,
}

impl SessionController {
    /// Controller with default timeouts.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn SessionStore>) -> Self {
        Self::with_config(&ApiConfig::default(), transport, store)
    }

    #[must_use]
    pub fn with_config(config: &ApiConfig, transport: Arc<dyn Transport>, store: Arc<dyn SessionStore>) -> Self {
        let core = Arc::new(SessionCore::new(store));
        let gateway = AuthGateway::new(transport, Arc::clone(&core), config);
        Self { core, gateway, init: Arc::new(OnceCell::new()) }
    }

    /// Pipeline for authenticated calls made by other screens.
    #[must_use]
    pub fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.core.snapshot()
    }

    /// Register a callback run after every session state change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SessionSnapshot) + Send + Sync + 'static,
    {
        self.core.subscribe(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.core.unsubscribe(id)
    }

    // -------------------------------------------------------------------------
    // role predicates
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.snapshot().is_admin()
    }

    #[must_use]
    pub fn is_coordinator(&self) -> bool {
        self.snapshot().is_coordinator()
    }

    #[must_use]
    pub fn is_teacher(&self) -> bool {
        self.snapshot().is_teacher()
    }

    #[must_use]
    pub fn can_access_admin_panel(&self) -> bool {
        self.snapshot().can_access_admin_panel()
    }

    #[must_use]
    pub fn can_access_coordinator_panel(&self) -> bool {
        self.snapshot().can_access_coordinator_panel()
    }

    /// Busy flag for login forms.
    #[must_use]
    pub fn is_login_pending(&self) -> bool {
        self.snapshot().login_pending
    }

    /// Guard decision for a region under the default login path.
    #[must_use]
    pub fn guard(&self, access: &Access) -> GuardDecision {
        RouteGuard::default().check(&self.snapshot(), access)
    }

    // -------------------------------------------------------------------------
    // operations
    // -------------------------------------------------------------------------

    /// Restore and verify a persisted session. Runs once; later and
    /// concurrent callers wait for the first run and get its outcome.
    pub async fn initialize(&self) -> SessionStatus {
        self.init.get_or_init(|| self.verify_persisted()).await;
        self.core.snapshot().status
    }

    async fn verify_persisted(&self) {
        if let Some(generation) = self.core.begin_verification() {
            tracing::debug!("verifying persisted session");
            match self.gateway.get::<UserProfile>(ME_PATH).await {
                Ok(profile) => {
                    self.core.complete_verification(generation, profile);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "persisted session rejected");
                    self.core.invalidate(Some(generation), ClearReason::VerificationFailed);
                }
            }
        }
        self.core.finish_initialization();
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Validation`] if either field is empty.
    /// - [`SessionError::LoginInProgress`] if another login is pending.
    /// - [`SessionError::Rejected`] with the service's message, or a
    ///   generic connection message when there is none.
    /// - [`SessionError::Superseded`] if a logout or invalidation landed
    ///   while the request was in flight.
    /// - [`SessionError::Storage`] if the session could not be persisted.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<UserProfile, SessionError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || secret.is_empty() {
            return Err(SessionError::Validation("Email and password are required.".to_owned()));
        }

        let ticket = self.core.begin_login()?;
        let request = ApiRequest::post(LOGIN_PATH).with_form([("username", identifier), ("password", secret)]);
        let response = self.gateway.send_public(request).await.map_err(|e| {
            tracing::info!(error = %e, "login rejected");
            SessionError::from_api(&e, LOGIN_FALLBACK_MESSAGE)
        })?;

        let login: LoginResponse = decode(&response).map_err(|e| {
            tracing::warn!(error = %e, "login response malformed");
            SessionError::from_api(&e, LOGIN_FALLBACK_MESSAGE)
        })?;
        if login.access_token.is_empty() {
            tracing::warn!("login response carried an empty token");
            return Err(SessionError::Rejected(LOGIN_FALLBACK_MESSAGE.to_owned()));
        }

        let profile = login.user;
        ticket.complete(login.access_token, profile.clone())?;
        Ok(profile)
    }

    /// End the session. Remote failures are logged and dropped.
    pub async fn logout(&self) {
        if self.core.credential().is_some() {
            if let Err(e) = self.gateway.post_empty(LOGOUT_PATH).await {
                tracing::warn!(error = %e, "remote logout failed; clearing locally");
            }
        }
        self.core.invalidate(None, ClearReason::Logout);
    }

    /// Fetch the current identity and refresh the cached profile.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`].
    pub async fn get_current_user(&self) -> Result<UserProfile, ApiError> {
        let generation = self.core.generation();
        let profile: UserProfile = self.gateway.get(ME_PATH).await?;
        self.core.refresh_profile(generation, profile.clone());
        Ok(profile)
    }

    /// # Errors
    ///
    /// [`SessionError::Validation`] for local rule violations, otherwise
    /// [`SessionError::Rejected`] with the service's message or a generic one.
    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), SessionError> {
        validate_password_change(current, new)?;
        let body = PasswordChange { current_password: current, new_password: new };
        self.gateway
            .post::<_, IgnoredAny>(CHANGE_PASSWORD_PATH, &body)
            .await
            .map(|_| ())
            .map_err(|e| SessionError::from_api(&e, CHANGE_PASSWORD_FALLBACK_MESSAGE))
    }

    /// Ask the service whether the current token is still valid.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`].
    pub async fn verify_token(&self) -> Result<TokenCheck, ApiError> {
        self.gateway.get(VERIFY_TOKEN_PATH).await
    }
}

/// Local checks run before a password change reaches the network.
///
/// # Errors
///
/// Returns [`SessionError::Validation`] describing the first failed rule.
pub fn validate_password_change(current: &str, new: &str) -> Result<(), SessionError> {
    if current.is_empty() || new.is_empty() {
        return Err(SessionError::Validation("Current and new password are required.".to_owned()));
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(SessionError::Validation(format!(
            "The new password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }
    if new == current {
        return Err(SessionError::Validation("The new password must differ from the current one.".to_owned()));
    }
    Ok(())
}
