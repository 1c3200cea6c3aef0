//! Session state machine and the shared core behind controller and gateway.
//!
//! DESIGN
//! ======
//! `SessionCore` is the single owner of in-memory session state and the only
//! writer of the [`SessionStore`]. The controller drives the normal
//! transitions; the gateway reaches in for exactly one thing, forced
//! invalidation on 401.
//!
//! Every session boundary (establish, logout, invalidation) bumps a
//! generation counter. Operations capture the generation when they start
//! and may only apply their result if it is still current, so a response
//! to a request issued before a logout can never bring the session back.
//!
//! The state mutex is never held across an `.await` and listeners run after
//! it is released.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::error::SessionError;
use crate::store::SessionStore;
use crate::types::{Role, UserProfile};

// =============================================================================
// STATUS + SNAPSHOT
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Uninitialized,
    Verifying,
    Authenticated,
    Unauthenticated,
}

/// Immutable view of the session handed to consumers.
///
/// Role predicates only answer `true` while `status` is `Authenticated`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub profile: Option<UserProfile>,
    /// `initialize()` has settled.
    pub initialized: bool,
    /// A login is in flight.
    pub login_pending: bool,
    pub generation: u64,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated && self.profile.is_some()
    }

    /// Initialization finished and no login is pending.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.initialized && !self.login_pending
    }

    /// Role of the authenticated user.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        if !self.is_authenticated() {
            return None;
        }
        self.profile.as_ref().map(|p| p.role)
    }

    /// Authenticated user's profile.
    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        if self.is_authenticated() { self.profile.as_ref() } else { None }
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    #[must_use]
    pub fn is_coordinator(&self) -> bool {
        self.has_role(Role::Coordinator)
    }

    #[must_use]
    pub fn is_teacher(&self) -> bool {
        self.has_role(Role::Teacher)
    }

    #[must_use]
    pub fn can_access_admin_panel(&self) -> bool {
        self.is_admin()
    }

    #[must_use]
    pub fn can_access_coordinator_panel(&self) -> bool {
        self.is_admin() || self.is_coordinator()
    }
}

/// Why a session was torn down. Logged, never shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearReason {
    Logout,
    Unauthorized,
    VerificationFailed,
    StorageFailure,
}

/// Bearer token plus the generation it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Credential {
    pub token: String,
    pub generation: u64,
}

pub type Listener = Arc<dyn Fn(&SessionSnapshot) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// =============================================================================
// CORE
// =============================================================================

#[derive(Default)]
struct SessionState {
    status: SessionStatus,
    token: Option<String>,
    profile: Option<UserProfile>,
    generation: u64,
    initialized: bool,
    login_pending: bool,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            profile: self.profile.clone(),
            initialized: self.initialized,
            login_pending: self.login_pending,
            generation: self.generation,
        }
    }

    fn reset(&mut self) {
        self.status = SessionStatus::Unauthenticated;
        self.token = None;
        self.profile = None;
        self.generation += 1;
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

pub(crate) struct SessionCore {
    state: Mutex<SessionState>,
    store: Arc<dyn SessionStore>,
    listeners: Mutex<Listeners>,
}

impl SessionCore {
    pub(crate) fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { state: Mutex::new(SessionState::default()), store, listeners: Mutex::new(Listeners::default()) }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        self.state().snapshot()
    }

    pub(crate) fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Token to attach to an outbound request, if a session exists or is being verified.
    pub(crate) fn credential(&self) -> Option<Credential> {
        let state = self.state();
        match state.status {
            SessionStatus::Verifying | SessionStatus::Authenticated => {
                state.token.clone().map(|token| Credential { token, generation: state.generation })
            }
            SessionStatus::Uninitialized | SessionStatus::Unauthenticated => None,
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.state().generation
    }

    // -------------------------------------------------------------------------
    // subscriptions
    // -------------------------------------------------------------------------

    pub(crate) fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let mut listeners = self.listeners();
        let id = SubscriptionId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry, _)| *entry != id);
        listeners.entries.len() != before
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let listeners: Vec<Listener> = self.listeners().entries.iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    // -------------------------------------------------------------------------
    // initialization
    // -------------------------------------------------------------------------

    /// Load the persisted session and enter `Verifying`.
    ///
    /// Returns the generation to verify under, or `None` when there is
    /// nothing to verify (empty store, or the session already left
    /// `Uninitialized`). A verification abandoned before initialization
    /// settled is resumed under its original generation.
    pub(crate) fn begin_verification(&self) -> Option<u64> {
        let persisted = self.store.get();
        let generation = {
            let mut state = self.state();
            if state.status == SessionStatus::Verifying && !state.initialized {
                tracing::debug!("resuming interrupted verification");
                return Some(state.generation);
            }
            if state.status != SessionStatus::Uninitialized {
                return None;
            }
            let persisted = persisted?;
            state.status = SessionStatus::Verifying;
            state.token = Some(persisted.token);
            state.profile = Some(persisted.profile);
            state.generation
        };
        self.notify();
        Some(generation)
    }

    /// Promote a verified session. Ignored if the generation moved on.
    pub(crate) fn complete_verification(&self, generation: u64, profile: UserProfile) -> bool {
        let token = {
            let state = self.state();
            if state.generation != generation || state.status != SessionStatus::Verifying {
                return false;
            }
            match state.token.clone() {
                Some(token) => token,
                None => return false,
            }
        };
        if let Err(e) = self.store.set(&token, &profile) {
            tracing::error!(error = %e, "failed to persist verified profile");
            self.invalidate(Some(generation), ClearReason::StorageFailure);
            return false;
        }
        {
            let mut state = self.state();
            if state.generation != generation || state.status != SessionStatus::Verifying {
                return false;
            }
            state.status = SessionStatus::Authenticated;
            state.profile = Some(profile);
        }
        tracing::info!("persisted session verified");
        self.notify();
        true
    }

    /// Mark initialization settled. A session that never left
    /// `Uninitialized` becomes `Unauthenticated`.
    pub(crate) fn finish_initialization(&self) {
        {
            let mut state = self.state();
            state.initialized = true;
            if state.status == SessionStatus::Uninitialized {
                state.status = SessionStatus::Unauthenticated;
            }
        }
        self.notify();
    }

    // -------------------------------------------------------------------------
    // login
    // -------------------------------------------------------------------------

    /// Claim the login slot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::LoginInProgress`] if a login is already pending.
    pub(crate) fn begin_login(self: &Arc<Self>) -> Result<LoginTicket, SessionError> {
        let generation = {
            let mut state = self.state();
            if state.login_pending {
                return Err(SessionError::LoginInProgress);
            }
            state.login_pending = true;
            state.generation
        };
        self.notify();
        Ok(LoginTicket { core: Arc::clone(self), generation, released: false })
    }

    fn end_login(&self) {
        {
            let mut state = self.state();
            state.login_pending = false;
        }
        self.notify();
    }

    /// Install a freshly issued credential, unless the session moved on
    /// since the operation started.
    fn establish(&self, generation: u64, token: String, profile: UserProfile) -> Result<(), SessionError> {
        if self.generation() != generation {
            return Err(SessionError::Superseded);
        }
        if let Err(e) = self.store.set(&token, &profile) {
            tracing::error!(error = %e, "failed to persist session");
            return Err(SessionError::Storage(e.to_string()));
        }
        {
            let mut state = self.state();
            if state.generation != generation {
                drop(state);
                self.rollback_store();
                return Err(SessionError::Superseded);
            }
            state.status = SessionStatus::Authenticated;
            state.token = Some(token);
            state.profile = Some(profile);
            state.generation += 1;
        }
        tracing::info!("session established");
        Ok(())
    }

    fn rollback_store(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "failed to clear superseded session");
        }
    }

    // -------------------------------------------------------------------------
    // profile refresh
    // -------------------------------------------------------------------------

    /// Replace the cached profile of the current authenticated session.
    pub(crate) fn refresh_profile(&self, generation: u64, profile: UserProfile) -> bool {
        let token = {
            let state = self.state();
            if state.generation != generation || state.status != SessionStatus::Authenticated {
                return false;
            }
            match state.token.clone() {
                Some(token) => token,
                None => return false,
            }
        };
        if let Err(e) = self.store.set(&token, &profile) {
            tracing::warn!(error = %e, "failed to persist refreshed profile");
        }
        {
            let mut state = self.state();
            if state.generation != generation {
                return false;
            }
            state.profile = Some(profile);
        }
        self.notify();
        true
    }

    // -------------------------------------------------------------------------
    // teardown
    // -------------------------------------------------------------------------

    /// Clear memory and storage and enter `Unauthenticated`.
    ///
    /// With `Some(generation)`, only applies if that generation is still
    /// current; stale invalidations return `false`.
    pub(crate) fn invalidate(&self, generation: Option<u64>, reason: ClearReason) -> bool {
        {
            let mut state = self.state();
            if generation.is_some_and(|g| g != state.generation) {
                return false;
            }
            // Storage is cleared while the state lock is held so no reader of
            // this core sees a cleared store next to a live in-memory session.
            if let Err(e) = self.store.clear() {
                tracing::error!(error = %e, ?reason, "failed to clear persisted session");
            }
            state.reset();
        }
        match reason {
            ClearReason::Logout => tracing::info!("session cleared by logout"),
            _ => tracing::warn!(?reason, "session invalidated"),
        }
        self.notify();
        true
    }
}

// =============================================================================
// LOGIN TICKET
// =============================================================================

/// Holds the login busy flag; releases it on drop so an abandoned login
/// future cannot leave the client stuck busy.
pub(crate) struct LoginTicket {
    core: Arc<SessionCore>,
    generation: u64,
    released: bool,
}

impl LoginTicket {
    /// Establish the session and release the busy flag.
    pub(crate) fn complete(mut self, token: String, profile: UserProfile) -> Result<(), SessionError> {
        let result = self.core.establish(self.generation, token, profile);
        self.released = true;
        self.core.end_login();
        result
    }
}

impl Drop for LoginTicket {
    fn drop(&mut self) {
        if !self.released {
            self.core.end_login();
        }
    }
}
