//! Config loading from an explicit key lookup (no process env mutation).

use std::collections::HashMap;

use paper_broker::config::{Config, ConfigError, DEFAULT_BIND_ADDR, DEFAULT_QUOTE_BASE_URL};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_apply_when_optional_vars_missing() {
    let config =
        Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret"), ("API_KEY", "pk_test")]))
            .unwrap();

    assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    assert_eq!(config.quote_base_url, DEFAULT_QUOTE_BASE_URL);
    assert_eq!(config.database_url, None);
    assert_eq!(config.jwt_secret, b"s3cret".to_vec());
    assert_eq!(config.quote_api_key, "pk_test");
}

#[test]
fn explicit_values_override_defaults() {
    let config = Config::from_lookup(lookup_from(&[
        ("JWT_SECRET", "s3cret"),
        ("API_KEY", "pk_test"),
        ("BIND_ADDR", "127.0.0.1:8080"),
        ("DATABASE_URL", "postgres://localhost/broker"),
        ("QUOTE_BASE_URL", "http://localhost:9000"),
    ]))
    .unwrap();

    assert_eq!(config.bind_addr, "127.0.0.1:8080");
    assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/broker"));
    assert_eq!(config.quote_base_url, "http://localhost:9000");
}

#[test]
fn blank_database_url_means_memory_store() {
    let config = Config::from_lookup(lookup_from(&[
        ("JWT_SECRET", "s3cret"),
        ("API_KEY", "pk_test"),
        ("DATABASE_URL", "  "),
    ]))
    .unwrap();

    assert_eq!(config.database_url, None);
}

#[test]
fn required_vars_are_enforced() {
    let missing_key = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap_err();
    assert_eq!(missing_key, ConfigError::Missing("API_KEY"));

    let missing_secret = Config::from_lookup(lookup_from(&[("API_KEY", "pk")])).unwrap_err();
    assert_eq!(missing_secret, ConfigError::Missing("JWT_SECRET"));

    let empty_secret =
        Config::from_lookup(lookup_from(&[("JWT_SECRET", ""), ("API_KEY", "pk")])).unwrap_err();
    assert_eq!(empty_secret, ConfigError::Empty("JWT_SECRET"));
}
