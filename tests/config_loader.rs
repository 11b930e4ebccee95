use lightgrid::config::{ConfigError, FetchOrdering, HttpConfig, ProviderConfig};
use lightgrid::{LimitTo, ProviderError, ServerDataProviderFactory, ViewSettings};

/// Test that ProviderConfig::default() produces the documented values.
#[test]
fn test_config_default_values() {
    let config = ProviderConfig::default();

    assert_eq!(config.debounce_ms, 150);
    assert_eq!(config.fetch_ordering, FetchOrdering::LastResponseWins);
    assert_eq!(config.default_view_settings, ViewSettings::default());
    assert_eq!(config.http.timeout_seconds, 30);
    assert_eq!(config.http.connect_timeout_seconds, 5);
}

/// Test that ProviderConfig::config_path() returns a path ending with the expected filename.
#[test]
fn test_config_path_ends_with_expected() {
    let path = ProviderConfig::config_path();
    assert!(path.ends_with("lightgrid/config.toml"));
}

/// Test that the config round-trips through TOML.
#[test]
fn test_config_toml_roundtrip() {
    let config = ProviderConfig {
        debounce_ms: 75,
        fetch_ordering: FetchOrdering::LatestRequestWins,
        default_view_settings: ViewSettings {
            limit_to: Some(LimitTo::new(50, 0)),
            ..ViewSettings::default()
        },
        http: HttpConfig::default(),
    };

    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("fetch_ordering = \"latest_request\""));

    let parsed: ProviderConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

/// Test that the factory refuses an invalid config.
#[test]
fn test_factory_validates_config() {
    let config = ProviderConfig {
        http: HttpConfig {
            timeout_seconds: 0,
            ..HttpConfig::default()
        },
        ..ProviderConfig::default()
    };

    match ServerDataProviderFactory::new(config) {
        Err(ProviderError::Config(ConfigError::ValidationError { message })) => {
            assert!(message.contains("timeouts"));
        }
        Err(other) => panic!("Expected ValidationError, got {other}"),
        Ok(_) => panic!("Expected ValidationError"),
    }
}
