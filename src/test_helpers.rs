//! Fixtures shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::controller::SessionController;
use crate::store::{MemoryStore, SessionStore};
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::types::{Role, UserProfile};

pub(crate) fn profile(role: Role) -> UserProfile {
    UserProfile {
        id: format!("{}-1", role.as_str()),
        email: format!("{}@school.test", role.as_str()),
        first_name: "Ana".to_owned(),
        last_name: "Pérez".to_owned(),
        role,
        department: Some("Mathematics".to_owned()),
        is_active: true,
        employee_code: None,
        phone: None,
    }
}

pub(crate) fn profile_json(role: Role) -> Value {
    serde_json::to_value(profile(role)).unwrap_or(Value::Null)
}

pub(crate) fn login_body(token: &str, role: Role) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 1800,
        "user": profile_json(role),
    })
}

pub(crate) fn ok(body: &Value) -> Result<ApiResponse, TransportError> {
    Ok(ApiResponse { status: 200, body: body.to_string() })
}

pub(crate) fn status(status: u16, body: &Value) -> Result<ApiResponse, TransportError> {
    Ok(ApiResponse { status, body: body.to_string() })
}

// =============================================================================
// SCRIPTED TRANSPORT
// =============================================================================

type Reply = Result<ApiResponse, TransportError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Transport answering from per-path FIFO scripts and recording every request.
///
/// Unscripted paths fail with `TransportError::Other`.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reply(&self, path: &str, reply: Reply) {
        self.push(path, Scripted::Ready(reply));
    }

    /// Script a reply that is released only when the returned sender fires.
    pub(crate) fn gate(&self, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(path, Scripted::Gated(rx));
        tx
    }

    fn push(&self, path: &str, scripted: Scripted) {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_owned())
            .or_default()
            .push_back(scripted);
    }

    pub(crate) fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn sent_to(&self, path: &str) -> Vec<ApiRequest> {
        self.sent().into_iter().filter(|r| r.path == path).collect()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let path = request.path.clone();
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(request);
        let next = self
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&path)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx.await.unwrap_or_else(|_| Err(TransportError::Other("gate dropped".to_owned()))),
            None => Err(TransportError::Other(format!("unscripted path {path}"))),
        }
    }
}

// =============================================================================
// CONTROLLER FIXTURES
// =============================================================================

pub(crate) struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub store: Arc<MemoryStore>,
    pub controller: SessionController,
}

pub(crate) fn harness() -> Harness {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::in_memory());
    let controller = SessionController::new(transport.clone(), store.clone());
    Harness { transport, store, controller }
}

/// Harness whose store already holds a session for `role` under `token`.
pub(crate) fn harness_with_stored(token: &str, role: Role) -> Harness {
    let h = harness();
    h.store.set(token, &profile(role)).unwrap_or_default();
    h
}

/// Harness already signed in as `role` with token `T1`.
pub(crate) async fn signed_in(role: Role) -> Harness {
    let h = harness();
    h.transport.reply("/auth/login", ok(&login_body("T1", role)));
    let _ = h.controller.login("user", "secret").await;
    h
}
