use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::ProviderConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl ProviderConfig {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/lightgrid/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("lightgrid").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// - If the file doesn't exist, returns `ProviderConfig::default()`.
    /// - Otherwise behaves like [`ProviderConfig::load_from`].
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(ProviderConfig::default());
        }

        Self::load_from(&path)
    }

    /// Parses and validates the TOML file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ProviderConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - HTTP timeouts are non-zero
    /// - A default paging window, if any, has a non-zero limit
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_seconds == 0 || self.http.connect_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "HTTP timeouts must be greater than zero".to_string(),
            });
        }

        if let Some(limit_to) = &self.default_view_settings.limit_to {
            if limit_to.limit == 0 {
                return Err(ConfigError::ValidationError {
                    message: "Default limit_to.limit must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchOrdering;
    use crate::settings::{FilterExpression, LimitTo, OrderBy};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = ProviderConfig::load_from(file.path()).unwrap();
        assert_eq!(config, ProviderConfig::default());
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.fetch_ordering, FetchOrdering::LastResponseWins);
    }

    #[test]
    fn test_full_file() {
        let file = write_config(
            r#"
debounce_ms = 0
fetch_ordering = "latest_request"

[default_view_settings.order_by]
expression = "name"
reverse = true

[default_view_settings.limit_to]
limit = 25

[default_view_settings.filter]
expression = { status = "open" }

[http]
timeout_seconds = 10
"#,
        );
        let config = ProviderConfig::load_from(file.path()).unwrap();

        assert_eq!(config.debounce_ms, 0);
        assert_eq!(config.fetch_ordering, FetchOrdering::LatestRequestWins);
        let settings = &config.default_view_settings;
        assert_eq!(settings.order_by, Some(OrderBy::new("name", true)));
        assert_eq!(settings.limit_to, Some(LimitTo::new(25, 0)));
        assert_eq!(
            settings.filter.as_ref().map(|f| &f.expression),
            Some(&FilterExpression::fields([("status", "open")]))
        );
        assert_eq!(config.http.timeout_seconds, 10);
        assert_eq!(config.http.connect_timeout_seconds, 5);
    }

    #[test]
    fn test_parse_error_reports_path() {
        let file = write_config("debounce_ms = \"soon\"");
        let err = ProviderConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = ProviderConfig::load_from(Path::new("/nonexistent/lightgrid.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_validation_rejects_zero_limit_and_timeouts() {
        let file = write_config("[default_view_settings.limit_to]\nlimit = 0\n");
        assert!(matches!(
            ProviderConfig::load_from(file.path()),
            Err(ConfigError::ValidationError { .. })
        ));

        let file = write_config("[http]\nconnect_timeout_seconds = 0\n");
        assert!(matches!(
            ProviderConfig::load_from(file.path()),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
