//! Runtime configuration resolved from the environment and saved settings.

use reqwest::Url;
use tracing::warn;

use crate::domain::Settings;

pub const API_BASE_URL_ENV: &str = "ESTATE_API_BASE_URL";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: Url,
}

impl AppConfig {
    /// Saved settings win over the environment, which wins over the default.
    /// Values that fail to parse are skipped with a warning.
    pub fn resolve(settings: &Settings) -> Self {
        let env_value = std::env::var(API_BASE_URL_ENV).ok();
        Self::from_sources(settings.api_base_url.as_deref(), env_value.as_deref())
    }

    fn from_sources(saved: Option<&str>, env: Option<&str>) -> Self {
        let candidates = [("settings", saved), (API_BASE_URL_ENV, env)];
        for (source, value) in candidates {
            let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            match normalize_base_url(value) {
                Ok(url) => return Self { api_base_url: url },
                Err(err) => warn!(source, value, %err, "ignoring invalid API base URL"),
            }
        }
        Self::default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default API base URL is valid")),
        }
    }
}

/// Parses a base URL and makes sure it ends in `/` so relative joins keep
/// the path prefix.
pub fn normalize_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_override_environment() {
        let config = AppConfig::from_sources(Some("https://a.example/api"), Some("https://b.example/"));
        assert_eq!(config.api_base_url.as_str(), "https://a.example/api/");
    }

    #[test]
    fn invalid_values_fall_through() {
        let config = AppConfig::from_sources(Some("not a url"), Some("https://b.example/v1"));
        assert_eq!(config.api_base_url.as_str(), "https://b.example/v1/");

        let config = AppConfig::from_sources(None, Some("  "));
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn joins_keep_path_prefix() {
        let base = normalize_base_url("http://localhost:8080/api").unwrap();
        assert_eq!(
            base.join("projects").unwrap().as_str(),
            "http://localhost:8080/api/projects"
        );
    }
}
