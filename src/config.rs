use crate::api::DEFAULT_BASE_URL;
use crate::load::{DETAIL_MIN_DISPLAY, LIST_MIN_DISPLAY};
use crate::view::ErrorPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {0}")]
    Invalid(String),
}

/// Runtime settings, read from `config.toml` and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub base_url: String,
    pub list_min_display_ms: u64,
    pub detail_min_display_ms: u64,
    /// Clear the detail screen's loading indicator when its fetch fails.
    pub detail_clears_loading_on_error: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_min_display_ms: LIST_MIN_DISPLAY.as_millis() as u64,
            detail_min_display_ms: DETAIL_MIN_DISPLAY.as_millis() as u64,
            detail_clears_loading_on_error: false,
        }
    }
}

impl Settings {
    /// Default location: `<config dir>/country-explorer/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "country-explorer", "country-explorer")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load settings from `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults; an explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let settings = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        settings.validate()?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url '{}': {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }

    pub fn list_min_display(&self) -> Duration {
        Duration::from_millis(self.list_min_display_ms)
    }

    pub fn detail_min_display(&self) -> Duration {
        Duration::from_millis(self.detail_min_display_ms)
    }

    pub fn list_policy(&self) -> ErrorPolicy {
        ErrorPolicy::LIST
    }

    pub fn detail_policy(&self) -> ErrorPolicy {
        ErrorPolicy::DETAIL.with_clear_loading(self.detail_clears_loading_on_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.base_url, "https://restcountries.com/v3.1");
        assert_eq!(s.list_min_display(), Duration::from_millis(3000));
        assert_eq!(s.detail_min_display(), Duration::from_millis(2000));
        assert!(s.list_policy().clear_loading_on_error);
        assert!(!s.detail_policy().clear_loading_on_error);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let s = Settings::from_toml("detail_clears_loading_on_error = true\nlist_min_display_ms = 0\n").unwrap();
        assert!(s.detail_policy().clear_loading_on_error);
        assert_eq!(s.list_min_display(), Duration::ZERO);
        assert_eq!(s.detail_min_display_ms, 2000);
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::from_toml("retries = 3\n").is_err());
    }

    #[test]
    fn test_validate_scheme() {
        let s = Settings { base_url: "ftp://example.com".to_string(), ..Settings::default() };
        assert!(matches!(s.validate(), Err(ConfigError::Invalid(_))));
        let s = Settings { base_url: "nope".to_string(), ..Settings::default() };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let path = std::env::temp_dir().join("country-explorer-missing-config.toml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(Settings::load(Some(&path)), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_explicit_file() {
        let path = std::env::temp_dir().join(format!("country-explorer-{}.toml", std::process::id()));
        std::fs::write(&path, "base_url = \"http://localhost:8080/v3.1\"\n").unwrap();
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.base_url, "http://localhost:8080/v3.1");
        std::fs::remove_file(&path).unwrap();
    }
}
