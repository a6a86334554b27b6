//! Tests for environment configuration

use super::*;
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_missing_uri_is_an_error() {
    let result = Config::from_lookup(lookup(&[(ENV_DATABASE, "testdb")]));

    assert_eq!(result, Err(ConfigError::Missing("MONGODB_URI")));
}

#[test]
fn test_empty_uri_is_an_error() {
    let result = Config::from_lookup(lookup(&[(ENV_URI, "")]));

    assert_eq!(result, Err(ConfigError::Missing("MONGODB_URI")));
}

#[test]
fn test_missing_uri_error_message() {
    let err = Config::from_lookup(lookup(&[])).unwrap_err();

    assert_eq!(err.to_string(), "MONGODB_URI is required");
}

#[test]
fn test_database_defaults_to_demo_app() {
    let config = Config::from_lookup(lookup(&[(ENV_URI, "mongodb://localhost:27017")])).unwrap();

    assert_eq!(config.database, "demo-app");
    assert_eq!(config.uri, "mongodb://localhost:27017");
}

#[test]
fn test_empty_database_falls_back_to_default() {
    let config = Config::from_lookup(lookup(&[
        (ENV_URI, "mongodb://localhost:27017"),
        (ENV_DATABASE, ""),
    ]))
    .unwrap();

    assert_eq!(config.database, DEFAULT_DATABASE);
}

#[test]
fn test_database_override() {
    let config = Config::from_lookup(lookup(&[
        (ENV_URI, "mongodb://localhost:27017"),
        (ENV_DATABASE, "testdb"),
    ]))
    .unwrap();

    assert_eq!(config.database, "testdb");
}

#[test]
fn test_fixed_listener_and_shutdown_budget() {
    let config = Config::from_lookup(lookup(&[(ENV_URI, "mongodb://localhost:27017")])).unwrap();

    assert_eq!(config.listen_addr.port(), 8080);
    assert!(config.listen_addr.ip().is_unspecified());
    assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
}

#[test]
fn test_credentials_route_is_opt_in() {
    let base = [(ENV_URI, "mongodb://localhost:27017")];
    assert!(!Config::from_lookup(lookup(&base)).unwrap().expose_credentials);

    for value in ["true", "1"] {
        let config = Config::from_lookup(lookup(&[
            (ENV_URI, "mongodb://localhost:27017"),
            (ENV_EXPOSE_CREDENTIALS, value),
        ]))
        .unwrap();
        assert!(config.expose_credentials, "{value} should enable the route");
    }

    let config = Config::from_lookup(lookup(&[
        (ENV_URI, "mongodb://localhost:27017"),
        (ENV_EXPOSE_CREDENTIALS, "yes please"),
    ]))
    .unwrap();
    assert!(!config.expose_credentials);
}
