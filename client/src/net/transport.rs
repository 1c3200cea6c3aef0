//! Browser `fetch` transport via `gloo-net`.
//!
//! Timeouts race the request against a `gloo-timers` future. Offline is
//! detected from `navigator.onLine`, both before sending and when a fetch
//! fails, so the notice bar can tell "no connection" from "server down".
//!
//! Without the `csr` feature the transport fails every request; only the
//! request preparation is meaningful off-browser.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use async_trait::async_trait;
use evalboard::transport::Method;
use evalboard::{ApiConfig, ApiRequest, ApiResponse, Transport, TransportError};

pub struct GlooTransport {
    config: ApiConfig,
}

/// A request resolved against the config, ready to hand to `fetch`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Prepared {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
    pub timeout_ms: u32,
}

impl GlooTransport {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub(crate) fn prepare(&self, request: &ApiRequest) -> Prepared {
        let mut headers = vec![("Accept", "application/json".to_owned())];
        if let Some(authorization) = request.authorization() {
            headers.push(("Authorization", authorization));
        }
        let body = request.body.encode().map(|(content_type, body)| {
            headers.push(("Content-Type", content_type.to_owned()));
            body
        });
        let timeout_ms = u32::try_from(self.config.timeout_for(request).as_millis()).unwrap_or(u32::MAX);
        Prepared { method: request.method, url: self.config.url_for(request), headers, body, timeout_ms }
    }
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let prepared = self.prepare(&request);
        #[cfg(feature = "csr")]
        {
            fetch(prepared).await
        }
        #[cfg(not(feature = "csr"))]
        {
            drop(prepared);
            Err(TransportError::Other("browser transport requires the csr feature".to_owned()))
        }
    }
}

#[cfg(feature = "csr")]
async fn fetch(prepared: Prepared) -> Result<ApiResponse, TransportError> {
    use futures::future::{Either, select};
    use gloo_net::http::{Method as HttpMethod, RequestBuilder};

    if !browser_online() {
        return Err(TransportError::Offline);
    }

    let method = match prepared.method {
        Method::Get => HttpMethod::GET,
        Method::Post => HttpMethod::POST,
        Method::Put => HttpMethod::PUT,
        Method::Patch => HttpMethod::PATCH,
        Method::Delete => HttpMethod::DELETE,
    };
    let mut builder = RequestBuilder::new(&prepared.url).method(method);
    for (name, value) in &prepared.headers {
        builder = builder.header(name, value);
    }
    let request = match prepared.body {
        Some(body) => builder.body(body),
        None => builder.build(),
    }
    .map_err(|e| TransportError::Other(e.to_string()))?;

    let send = Box::pin(request.send());
    let timeout = gloo_timers::future::TimeoutFuture::new(prepared.timeout_ms);
    let response = match select(send, timeout).await {
        Either::Left((result, _)) => result.map_err(|e| classify(&e))?,
        Either::Right(((), _)) => return Err(TransportError::Timeout),
    };

    let status = response.status();
    let body = response.text().await.map_err(|e| classify(&e))?;
    Ok(ApiResponse { status, body })
}

#[cfg(feature = "csr")]
fn classify(error: &gloo_net::Error) -> TransportError {
    if browser_online() { TransportError::Unreachable(error.to_string()) } else { TransportError::Offline }
}

#[cfg(feature = "csr")]
fn browser_online() -> bool {
    web_sys::window().is_none_or(|window| window.navigator().on_line())
}
