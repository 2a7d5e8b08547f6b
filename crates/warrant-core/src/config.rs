//! Evaluator configuration.
//!
//! Loaded from TOML at startup:
//!
//! ```toml
//! # Bound every policy / condition await. Omit for no limit.
//! decision_timeout_ms = 2000
//! # Default for AuthorizeOptions::from_config().
//! explain_by_default = false
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use warrant_contracts::error::{WarrantError, WarrantResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorizerConfig {
    /// Upper bound, in milliseconds, on each decision-function await.
    /// `None` leaves latency unbounded.
    pub decision_timeout_ms: Option<u64>,

    /// Whether options built from this config expose denial reasons.
    pub explain_by_default: bool,
}

impl AuthorizerConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `WarrantError::ConfigError` if the TOML is malformed, has
    /// unknown keys, or sets a zero timeout.
    pub fn from_toml_str(s: &str) -> WarrantResult<Self> {
        let config: AuthorizerConfig = toml::from_str(s).map_err(|e| WarrantError::ConfigError {
            reason: format!("failed to parse authorizer TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML.
    pub fn from_file(path: &Path) -> WarrantResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| WarrantError::ConfigError {
            reason: format!("failed to read authorizer config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Set the decision timeout, rounded down to whole milliseconds.
    ///
    /// Rejects a timeout under one millisecond, as `from_toml_str` does.
    pub fn with_decision_timeout(mut self, timeout: Duration) -> WarrantResult<Self> {
        self.decision_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self.validate()?;
        Ok(self)
    }

    pub fn decision_timeout(&self) -> Option<Duration> {
        self.decision_timeout_ms.map(Duration::from_millis)
    }

    fn validate(&self) -> WarrantResult<()> {
        if self.decision_timeout_ms == Some(0) {
            return Err(WarrantError::ConfigError {
                reason: "decision_timeout_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use warrant_contracts::error::WarrantError;

    use super::AuthorizerConfig;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AuthorizerConfig::from_toml_str("").unwrap();
        assert_eq!(config, AuthorizerConfig::default());
        assert_eq!(config.decision_timeout(), None);
        assert!(!config.explain_by_default);
    }

    #[test]
    fn parses_all_keys() {
        let config = AuthorizerConfig::from_toml_str(
            r#"
            decision_timeout_ms = 1500
            explain_by_default = true
        "#,
        )
        .unwrap();

        assert_eq!(config.decision_timeout(), Some(Duration::from_millis(1500)));
        assert!(config.explain_by_default);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        for bad in [
            "decision_timeout = 10",
            "decision_timeout_ms = \"fast\"",
            "this is not valid toml ][[[",
        ] {
            match AuthorizerConfig::from_toml_str(bad) {
                Err(WarrantError::ConfigError { reason }) => {
                    assert!(reason.contains("failed to parse authorizer TOML"), "got: {reason}");
                }
                other => panic!("expected ConfigError for {bad:?}, got {:?}", other),
            }
        }
    }

    #[test]
    fn rejects_zero_timeout() {
        match AuthorizerConfig::from_toml_str("decision_timeout_ms = 0") {
            Err(WarrantError::ConfigError { reason }) => {
                assert!(reason.contains("greater than zero"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn builder_rejects_zero_timeout_like_the_parser() {
        for zero in [Duration::ZERO, Duration::from_micros(500)] {
            match AuthorizerConfig::default().with_decision_timeout(zero) {
                Err(WarrantError::ConfigError { reason }) => {
                    assert!(reason.contains("greater than zero"));
                }
                other => panic!("expected ConfigError for {zero:?}, got {:?}", other),
            }
        }

        let config = AuthorizerConfig::default()
            .with_decision_timeout(Duration::from_millis(250))
            .unwrap();
        assert_eq!(config.decision_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = AuthorizerConfig::from_file(std::path::Path::new("/nonexistent/warrant.toml"));
        assert!(matches!(result, Err(WarrantError::ConfigError { .. })));
    }
}
