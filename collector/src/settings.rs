//! Collector settings: built-in defaults, an optional TOML file, then
//! `HH_`-prefixed environment variables (e.g. `HH_PER_PAGE=50`).

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::client::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HhClient};
use crate::collector::CollectOptions;
use crate::error::Result;
use crate::query::MAX_PER_PAGE;

pub const DEFAULT_CONFIG_FILE: &str = "hh.toml";
const ENV_PREFIX: &str = "HH";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub user_agent: String,
    pub per_page: u32,
    pub max_pages: Option<u32>,
    pub area: Option<String>,
    pub fetch_details: bool,
    pub detail_attempts: u32,
    pub detail_retry_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            per_page: MAX_PER_PAGE,
            max_pages: None,
            area: None,
            fetch_details: true,
            detail_attempts: 3,
            detail_retry_delay_ms: 5_000,
        }
    }
}

impl Settings {
    /// Load settings. An explicit `file` must exist; otherwise `hh.toml` is read if present.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let source = match file {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };
        Self::from_builder(Config::builder().add_source(source))
    }

    /// Load from an inline TOML snippet, still honouring the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder().add_source(File::from_str(toml, config::FileFormat::Toml)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn client(&self) -> Result<HhClient> {
        Ok(HhClient::new(&self.base_url, &self.user_agent)?.with_detail_retries(
            self.detail_attempts,
            Duration::from_millis(self.detail_retry_delay_ms),
        ))
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            max_pages: self.max_pages,
            fetch_details: self.fetch_details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.base_url, "https://api.hh.ru");
        assert_eq!(settings.per_page, 100);
        assert_eq!(settings.max_pages, None);
        assert!(settings.fetch_details);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let settings = Settings::from_toml_str(
            r#"
per_page = 20
max_pages = 5
area = "1"
fetch_details = false
"#,
        )
        .unwrap();
        assert_eq!(settings.per_page, 20);
        assert_eq!(settings.max_pages, Some(5));
        assert_eq!(settings.area.as_deref(), Some("1"));
        assert!(!settings.fetch_details);
        assert_eq!(settings.detail_attempts, 3);
    }

    #[test]
    fn test_options_follow_settings() {
        let settings = Settings {
            max_pages: Some(4),
            fetch_details: false,
            ..Settings::default()
        };
        assert_eq!(
            settings.collect_options(),
            CollectOptions {
                max_pages: Some(4),
                fetch_details: false
            }
        );
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/hh.toml"))).is_err());
    }
}
