use super::*;

#[test]
fn api_config_defaults_without_build_url() {
    assert_eq!(api_config(None), ApiConfig::default());
}

#[test]
fn api_config_uses_build_url() {
    let config = api_config(Some("https://eval.example.edu/"));
    assert_eq!(config.base_url, "https://eval.example.edu");
    assert_eq!(config.api_prefix, "/api/v1");
}

#[test]
fn api_config_ignores_invalid_build_url() {
    assert_eq!(api_config(Some("not a url")), ApiConfig::default());
}
