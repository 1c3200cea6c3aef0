//! Transport seam between the auth gateway and an HTTP stack.
//!
//! DESIGN
//! ======
//! Requests are plain data so the gateway can stamp credentials onto them
//! and tests can script responses without a network. Body encoding lives
//! here; concrete transports only move bytes.
//!
//! The trait is `?Send` because browser fetch futures hold JS values. The
//! transport object itself stays `Send + Sync` so it can be shared behind
//! an `Arc` in reactive contexts.

#[cfg(feature = "reqwest")]
pub mod http;


use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// HTTP verbs used against the evaluation service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Which root a request path is relative to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Under the versioned API prefix (`/api/v1`).
    Api,
    /// Directly under the service root (health checks).
    Root,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Content type and encoded payload, or `None` for an empty body.
    #[must_use]
    pub fn encode(&self) -> Option<(&'static str, String)> {
        match self {
            Self::Empty => None,
            Self::Json(value) => Some(("application/json", value.to_string())),
            Self::Form(fields) => Some(("application/x-www-form-urlencoded", encode_pairs(fields))),
        }
    }
}

/// A request to the evaluation service, before or after credential injection.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the request's scope, starting with `/`.
    pub path: String,
    pub scope: Scope,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Bearer token. Set only by the gateway's outbound stage.
    pub bearer: Option<String>,
    /// Overrides the transport's default timeout.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            scope: Scope::Api,
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Address the request to the service root instead of the API prefix.
    #[must_use]
    pub fn at_root(mut self) -> Self {
        self.scope = Scope::Root;
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    #[must_use]
    pub fn with_form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub(crate) fn with_bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_owned());
        self
    }

    /// Value for the `Authorization` header, if a credential is attached.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_ref().map(|token| format!("Bearer {token}"))
    }

    /// Path with the percent-encoded query string appended.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        let path = if self.path.starts_with('/') { self.path.clone() } else { format!("/{}", self.path) };
        if self.query.is_empty() { path } else { format!("{path}?{}", encode_pairs(&self.query)) }
    }
}

/// Raw response: status code and body text. Interpretation belongs to the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Failures below HTTP: no status code was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network is offline")]
    Offline,
    #[error("server unreachable: {0}")]
    Unreachable(String),
    #[error("request failed: {0}")]
    Other(String),
}

/// Sends one request and returns whatever status came back.
///
/// Implementations must not interpret status codes; a 401 is an `Ok`
/// response here.
#[async_trait(?Send)]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no HTTP response was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
