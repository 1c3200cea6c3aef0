//! Authenticated request pipeline to the evaluation service.
//!
//! DESIGN
//! ======
//! Two stages around a [`Transport`]:
//! - outbound: attach the current bearer token, if any;
//! - inbound: classify the status into [`ApiError`], and on 401 force the
//!   session closed before the caller sees the error.
//!
//! The gateway is the only code outside the controller that mutates
//! session state, and it only ever clears it.
//!
//! TRADE-OFFS
//! ==========
//! A 401 only invalidates when the request carried the credential of the
//! *current* session generation. A late 401 for a token that was already
//! replaced says nothing about the new one, and a 401 on a request without
//! any credential (a failed sign-in) has no session to end.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::session::{ClearReason, SessionCore};
use crate::transport::{ApiRequest, ApiResponse, Transport};

pub const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
pub struct AuthGateway {
    transport: Arc<dyn Transport>,
    session: Arc<SessionCore>,
    health_timeout: Duration,
}

impl AuthGateway {
    pub(crate) fn new(transport: Arc<dyn Transport>, session: Arc<SessionCore>, config: &ApiConfig) -> Self {
        Self { transport, session, health_timeout: config.health_timeout }
    }

    /// Send a request with the current credential attached.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for any non-2xx status or
    /// transport failure. On [`ApiError::Authentication`] the session has
    /// already been invalidated.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let credential = self.session.credential();
        let request = match &credential {
            Some(credential) => request.with_bearer(&credential.token),
            None => request,
        };
        let generation = credential.map(|c| c.generation);
        self.dispatch(request, generation).await
    }

    /// Send a request without any credential, even if a session exists.
    ///
    /// Used for credential exchange and health checks.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`]; never invalidates the session.
    pub async fn send_public(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.dispatch(request, None).await
    }

    async fn dispatch(&self, request: ApiRequest, generation: Option<u64>) -> Result<ApiResponse, ApiError> {
        let method = request.method.as_str();
        let path = request.path.clone();
        tracing::debug!(method, path = %path, authenticated = generation.is_some(), "api request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(method, path = %path, error = %e, "api request failed");
                return Err(ApiError::Network(e));
            }
        };

        tracing::debug!(method, path = %path, status = response.status, "api response");
        if response.is_success() {
            return Ok(response);
        }

        let error = ApiError::from_status(response.status, &response.body);
        if error.is_authentication() {
            if let Some(generation) = generation {
                if self.session.invalidate(Some(generation), ClearReason::Unauthorized) {
                    tracing::warn!(method, path = %path, "credential rejected; session invalidated");
                } else {
                    tracing::debug!(method, path = %path, "stale 401 ignored");
                }
            }
        }
        Err(error)
    }

    // -------------------------------------------------------------------------
    // typed helpers
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// See [`AuthGateway::send`]; also [`ApiError::Decode`] on a body mismatch.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode(&self.send(ApiRequest::get(path)).await?)
    }

    /// # Errors
    ///
    /// See [`AuthGateway::get`].
    pub async fn get_with_query<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        let request = query.iter().fold(ApiRequest::get(path), |req, (k, v)| req.with_query(*k, *v));
        decode(&self.send(request).await?)
    }

    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// See [`AuthGateway::get`]; [`ApiError::Validation`] if `body` does not serialize.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let request = ApiRequest::post(path).with_json(to_json(body)?);
        decode(&self.send(request).await?)
    }

    /// POST without a body, returning the raw response.
    ///
    /// # Errors
    ///
    /// See [`AuthGateway::send`].
    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::post(path)).await
    }

    /// POST form-encoded fields.
    ///
    /// # Errors
    ///
    /// See [`AuthGateway::get`].
    pub async fn post_form<T: DeserializeOwned>(&self, path: &str, fields: &[(&str, &str)]) -> Result<T, ApiError> {
        let request = ApiRequest::post(path).with_form(fields.iter().copied());
        decode(&self.send(request).await?)
    }

    /// # Errors
    ///
    /// See [`AuthGateway::post`].
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let request = ApiRequest::put(path).with_json(to_json(body)?);
        decode(&self.send(request).await?)
    }

    /// # Errors
    ///
    /// See [`AuthGateway::post`].
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let request = ApiRequest::patch(path).with_json(to_json(body)?);
        decode(&self.send(request).await?)
    }

    /// # Errors
    ///
    /// See [`AuthGateway::send`].
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Probe `/health` at the service root. Never carries a credential.
    pub async fn check_connection(&self) -> bool {
        let request = ApiRequest::get(HEALTH_PATH).at_root().with_timeout(self.health_timeout);
        match self.send_public(request).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "health check failed");
                false
            }
        }
    }
}

/// Decode a success body. A blank body decodes as JSON `null`.
pub(crate) fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    let body = if response.body.trim().is_empty() { "null" } else { response.body.as_str() };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Validation(e.to_string()))
}
