//! # evalboard
//!
//! Session and authentication core for the teacher-evaluation front-end.
//!
//! ARCHITECTURE
//! ============
//! Leaf to root:
//! - `store` persists the bearer token and cached profile as one unit.
//! - `gateway` wraps a `transport` and is the only path to the remote
//!   service: it injects the credential and force-invalidates on 401.
//! - `controller` owns the session state machine (`session`) and exposes
//!   initialize/login/logout/change-password plus role predicates.
//! - `guard` turns a session snapshot and a role requirement into an
//!   allow/redirect/loading decision.
//!
//! Everything is composed explicitly at construction time; there is no
//! process-wide state. The web client (`client/`) and the CLI (`cli/`)
//! each build one `SessionController` and pass it around.

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod session;
pub mod store;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::ApiConfig;
pub use controller::SessionController;
pub use error::{ApiError, SessionError};
pub use gateway::AuthGateway;
pub use guard::{Access, GuardDecision, RouteGuard, access_for_path};
pub use session::{SessionSnapshot, SessionStatus, SubscriptionId};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
pub use transport::{ApiRequest, ApiResponse, Transport, TransportError};
pub use types::{Role, TokenCheck, UserProfile};

#[cfg(feature = "reqwest")]
pub use transport::http::ReqwestTransport;
