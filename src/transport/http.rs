//! `reqwest`-backed transport for native clients.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use super::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use crate::config::ApiConfig;

const CONNECT_TIMEOUT_SECS: u64 = 5;

pub struct ReqwestTransport {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`TransportError::Other`] if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.config.url_for(&request);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .http
            .request(method, &url)
            .header(ACCEPT, "application/json")
            .timeout(self.config.timeout_for(&request));
        if let Some(auth) = request.authorization() {
            builder = builder.header(AUTHORIZATION, auth);
        }
        if let Some((content_type, body)) = request.body.encode() {
            builder = builder.header(CONTENT_TYPE, content_type).body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;
        Ok(ApiResponse { status, body })
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Unreachable(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}
