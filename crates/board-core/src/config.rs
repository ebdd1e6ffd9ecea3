//! Configuration for the board client.
//!
//! Defaults, then TOML, then environment overrides.

use serde::Deserialize;
use std::path::Path;

pub const ENV_API_URL: &str = "CAVERNA_API_URL";
pub const ENV_API_TOKEN: &str = "CAVERNA_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Base URL of the REST API. `None` runs against the in-memory store.
    pub api_base_url: Option<String>,
    /// Bearer token sent with every request
    pub auth_token: Option<String>,
    pub request_timeout_ms: u64,
    /// Quiet period before inline edits (column title, subtask name) are sent
    pub rename_debounce_ms: u64,
    /// Pointer travel before a press becomes a drag
    pub drag_activation_px: i32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            auth_token: None,
            request_timeout_ms: 10_000,
            rename_debounce_ms: 500,
            drag_activation_px: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl BoardConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Apply `CAVERNA_API_URL` / `CAVERNA_API_TOKEN` when set
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_API_TOKEN).ok(),
        )
    }

    pub fn with_overrides(
        mut self,
        api_base_url: Option<String>,
        auth_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = api_base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = Some(url);
        }
        if let Some(token) = auth_token.filter(|t| !t.trim().is_empty()) {
            self.auth_token = Some(token);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.api_base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: "api_base_url",
                    reason: format!("expected an http(s) URL, got {:?}", url),
                });
            }
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.drag_activation_px < 0 {
            return Err(ConfigError::InvalidValue {
                field: "drag_activation_px",
                reason: "must be >= 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert!(config.api_base_url.is_none());
        assert_eq!(config.rename_debounce_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BoardConfig::from_toml_str(
            r#"
            api_base_url = "https://api.example.com"
            rename_debounce_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.rename_debounce_ms, 250);
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = BoardConfig::from_toml_str("colour = \"red\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = BoardConfig::default()
            .with_overrides(Some("ftp://nope".into()), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "api_base_url", .. }));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "drag_activation_px = 8").unwrap();
        let config = BoardConfig::from_path(file.path()).unwrap();
        assert_eq!(config.drag_activation_px, 8);
    }

    #[test]
    fn test_blank_overrides_ignored() {
        let config = BoardConfig::default()
            .with_overrides(Some("  ".into()), Some("tok".into()))
            .unwrap();
        assert!(config.api_base_url.is_none());
        assert_eq!(config.auth_token.as_deref(), Some("tok"));
    }
}
