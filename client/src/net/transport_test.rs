use std::time::Duration;

use super::*;

fn transport() -> GlooTransport {
    GlooTransport::new(ApiConfig::default())
}

#[test]
fn prepare_resolves_api_prefix_and_accept_header() {
    let prepared = transport().prepare(&ApiRequest::get("/auth/me"));
    assert_eq!(prepared.method, Method::Get);
    assert_eq!(prepared.url, "http://localhost:8000/api/v1/auth/me");
    assert_eq!(prepared.headers, vec![("Accept", "application/json".to_owned())]);
    assert_eq!(prepared.body, None);
    assert_eq!(prepared.timeout_ms, 10_000);
}

#[test]
fn prepare_adds_bearer_and_form_content_type() {
    let mut request = ApiRequest::post("/auth/login").with_form([("username", "a@x.com"), ("password", "p 1")]);
    request.bearer = Some("T".to_owned());

    let prepared = transport().prepare(&request);

    assert!(prepared.headers.contains(&("Authorization", "Bearer T".to_owned())));
    assert!(prepared.headers.contains(&("Content-Type", "application/x-www-form-urlencoded".to_owned())));
    assert_eq!(prepared.body.as_deref(), Some("username=a%40x.com&password=p%201"));
}

#[test]
fn prepare_health_check_targets_root_with_override_timeout() {
    let request = ApiRequest::get("/health").at_root().with_timeout(Duration::from_secs(5));
    let prepared = transport().prepare(&request);
    assert_eq!(prepared.url, "http://localhost:8000/health");
    assert_eq!(prepared.timeout_ms, 5_000);
}

#[cfg(not(feature = "csr"))]
#[test]
fn native_build_refuses_to_send() {
    let result = block_on(transport().send(ApiRequest::get("/auth/me")));
    assert!(matches!(result, Err(TransportError::Other(_))));
}

#[cfg(not(feature = "csr"))]
fn block_on<F: std::future::Future>(future: F) -> F::Output {
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    let mut future = pin!(future);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return output;
        }
    }
}
