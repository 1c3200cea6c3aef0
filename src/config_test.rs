use std::collections::HashMap;
use std::time::Duration;

use super::*;
use crate::transport::ApiRequest;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// from_lookup
// =============================================================================

#[test]
fn defaults_when_nothing_is_set() {
    let config = ApiConfig::from_lookup(|_| None).unwrap();
    assert_eq!(config, ApiConfig::default());
    assert_eq!(config.base_url, "http://localhost:8000");
    assert_eq!(config.api_prefix, "/api/v1");
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.health_timeout, Duration::from_secs(5));
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let config = ApiConfig::from_lookup(lookup_from(&[("EVAL_API_URL", "https://eval.example.org/")])).unwrap();
    assert_eq!(config.base_url, "https://eval.example.org");
}

#[test]
fn non_http_base_url_is_rejected() {
    let err = ApiConfig::from_lookup(lookup_from(&[("EVAL_API_URL", "ftp://eval")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidBaseUrl("ftp://eval".to_owned()));
}

#[test]
fn empty_host_is_rejected() {
    assert!(ApiConfig::from_lookup(lookup_from(&[("EVAL_API_URL", "http://")])).is_err());
}

#[test]
fn prefix_is_normalized() {
    let config = ApiConfig::from_lookup(lookup_from(&[("EVAL_API_PREFIX", "api/v2/")])).unwrap();
    assert_eq!(config.api_prefix, "/api/v2");
}

#[test]
fn malformed_timeouts_fall_back_to_defaults() {
    let config = ApiConfig::from_lookup(lookup_from(&[
        ("EVAL_API_TIMEOUT_SECS", "soon"),
        ("EVAL_HEALTH_TIMEOUT_SECS", "0"),
    ]))
    .unwrap();
    assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    assert_eq!(config.health_timeout, Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS));
}

#[test]
fn explicit_timeouts_are_used() {
    let config = ApiConfig::from_lookup(lookup_from(&[("EVAL_API_TIMEOUT_SECS", "30")])).unwrap();
    assert_eq!(config.timeout, Duration::from_secs(30));
}

// =============================================================================
// url_for / timeout_for
// =============================================================================

#[test]
fn api_scope_urls_include_prefix() {
    let config = ApiConfig::default();
    assert_eq!(config.url_for(&ApiRequest::get("/auth/me")), "http://localhost:8000/api/v1/auth/me");
}

#[test]
fn root_scope_urls_skip_prefix() {
    let config = ApiConfig::default();
    assert_eq!(config.url_for(&ApiRequest::get("/health").at_root()), "http://localhost:8000/health");
}

#[test]
fn with_base_url_validates() {
    let config = ApiConfig::default().with_base_url("http://10.0.0.5:9000/").unwrap();
    assert_eq!(config.base_url, "http://10.0.0.5:9000");
    assert!(ApiConfig::default().with_base_url("localhost").is_err());
}

#[test]
fn per_request_timeout_overrides_default() {
    let config = ApiConfig::default();
    let req = ApiRequest::get("/health").with_timeout(Duration::from_secs(2));
    assert_eq!(config.timeout_for(&req), Duration::from_secs(2));
    assert_eq!(config.timeout_for(&ApiRequest::get("/x")), Duration::from_secs(10));
}
