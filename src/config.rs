use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the board backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the REST API, e.g. `https://boards.example.com/api`
    pub base_url: String,
    /// Bearer token sent with every request
    pub auth_token: Option<String>,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            auth_token: None,
            timeout_ms: 10_000,
        }
    }
}

impl ClientConfig {
    const ENV_URL: &'static str = "KANBAN_API_URL";
    const ENV_TOKEN: &'static str = "KANBAN_API_TOKEN";
    const ENV_TIMEOUT: &'static str = "KANBAN_API_TIMEOUT_MS";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Parses a JSON config; missing keys fall back to the defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `KANBAN_API_URL`, `KANBAN_API_TOKEN` and
    /// `KANBAN_API_TIMEOUT_MS` from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(Self::ENV_URL) {
            self.base_url = url;
        }
        if let Some(token) = lookup(Self::ENV_TOKEN) {
            self.auth_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(timeout) = lookup(Self::ENV_TIMEOUT) {
            self.timeout_ms = timeout.trim().parse().map_err(|_| {
                BoardError::ConfigError(format!(
                    "{} must be a number of milliseconds, got '{}'",
                    Self::ENV_TIMEOUT,
                    timeout
                ))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(BoardError::ConfigError(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(BoardError::ConfigError(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = ClientConfig::from_json_str(r#"{"base_url": "https://boards.test/api"}"#)
            .unwrap();
        assert_eq!(config.base_url, "https://boards.test/api");
        assert_eq!(config.timeout_ms, 10_000);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_from_json_rejects_bad_url() {
        let result = ClientConfig::from_json_str(r#"{"base_url": "ftp://nope"}"#);
        assert!(matches!(result, Err(BoardError::ConfigError(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("KANBAN_API_URL", "https://override.test"),
            ("KANBAN_API_TOKEN", "secret"),
            ("KANBAN_API_TIMEOUT_MS", "2500"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::default()
            .with_overrides_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.base_url, "https://override.test");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout_ms, 2500);
    }

    #[test]
    fn test_invalid_timeout_override() {
        let result = ClientConfig::default().with_overrides_from(|key| {
            (key == "KANBAN_API_TIMEOUT_MS").then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(BoardError::ConfigError(_))));
    }

    #[test]
    fn test_empty_token_override_clears_token() {
        let config = ClientConfig::default()
            .with_token("old")
            .with_overrides_from(|key| (key == "KANBAN_API_TOKEN").then(String::new))
            .unwrap();
        assert!(config.auth_token.is_none());
    }
}
