//! Watch configuration structures.
//!
//! A config file holds one or more named modes, each a complete search
//! definition. Defaults mirror the long-standing deployment values.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A single search filter value: scalar or list of scalars.
///
/// Lists expand to repeated query tags in the search URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FilterValue {
    One(FilterScalar),
    Many(Vec<FilterScalar>),
}

/// A scalar filter value (integer or text).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FilterScalar {
    Int(i64),
    Text(String),
}

impl FilterScalar {
    pub fn render(&self) -> String {
        match self {
            FilterScalar::Int(n) => n.to_string(),
            FilterScalar::Text(s) => s.clone(),
        }
    }
}

impl FilterValue {
    /// Expand this value into the list of strings it contributes to the URL.
    pub fn values(&self) -> Vec<String> {
        match self {
            FilterValue::One(scalar) => vec![scalar.render()],
            FilterValue::Many(scalars) => scalars.iter().map(FilterScalar::render).collect(),
        }
    }
}

/// One named watch mode: a complete search + notification definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Human-readable search name, used in the notification subject
    pub name: String,

    /// Target mean seconds between cycle starts
    pub refresh_rate: f64,

    /// Standard deviation of the Gaussian jitter added to each delay
    #[serde(default = "defaults::refresh_sigma")]
    pub refresh_sigma: f64,

    /// Craigslist locale subdomain
    #[serde(default = "defaults::locale")]
    pub locale: String,

    /// Search category code
    #[serde(default = "defaults::category")]
    pub category: String,

    /// Optional sub-locale path segment
    #[serde(default)]
    pub sublocale: Option<String>,

    /// Direct search link; overrides locale/category/filters when set
    #[serde(default)]
    pub direct_link: Option<String>,

    /// Query tags inserted into the constructed search URL
    #[serde(default)]
    pub search_filters: BTreeMap<String, FilterValue>,

    /// Webhook endpoint for new-listing notifications
    pub webhook_url: String,

    /// Directory for the persisted dedup index
    #[serde(default = "defaults::data_dir")]
    pub data_dir: String,

    /// HTTP fetch behavior
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// HTTP client settings for page fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

impl WatchConfig {
    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name is empty"));
        }
        if self.refresh_rate <= 0.0 {
            return Err(AppError::validation("refresh_rate must be > 0"));
        }
        if self.refresh_sigma < 0.0 {
            return Err(AppError::validation("refresh_sigma must be >= 0"));
        }
        if self.webhook_url.trim().is_empty() {
            return Err(AppError::validation("webhook_url is empty"));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.direct_link.is_none() && self.search_filters.is_empty() {
            return Err(AppError::validation(
                "must specify either a direct link or search filters",
            ));
        }
        Ok(())
    }

    /// Path of the persisted dedup index for this config file and mode.
    ///
    /// One index per (config-name, mode) pair, so searches never share
    /// seen-id state.
    pub fn index_path(&self, config_path: &Path, mode: &str) -> PathBuf {
        let stem = config_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("watch")
            .to_lowercase();
        PathBuf::from(&self.data_dir).join(format!("{}_{}.idx", stem, mode))
    }
}

/// A config file: map of mode name to watch definition.
pub type ConfigFile = BTreeMap<String, WatchConfig>;

/// Default values matching the long-standing deployment configuration.
mod defaults {
    pub fn refresh_sigma() -> f64 {
        3.0
    }

    pub fn locale() -> String {
        "sfbay".to_string()
    }

    pub fn category() -> String {
        "cta".to_string()
    }

    pub fn data_dir() -> String {
        "data".to_string()
    }

    pub fn user_agent() -> String {
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/120.0 Safari/537.36"
            .to_string()
    }

    pub fn timeout() -> u64 {
        30
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
        [bikes]
        name = "bikes"
        refresh_rate = 60.0
        webhook_url = "https://hooks.example.com/abc"

        [bikes.search_filters]
        query = "road bike"
        min_price = 100
        condition = [10, 20]
        "#
    }

    #[test]
    fn test_parse_with_defaults() {
        let file: ConfigFile = toml::from_str(minimal_toml()).unwrap();
        let config = &file["bikes"];

        assert_eq!(config.locale, "sfbay");
        assert_eq!(config.category, "cta");
        assert_eq!(config.refresh_sigma, 3.0);
        assert_eq!(config.data_dir, "data");
        assert!(config.sublocale.is_none());
        assert!(config.direct_link.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_filter_values_expand() {
        let file: ConfigFile = toml::from_str(minimal_toml()).unwrap();
        let filters = &file["bikes"].search_filters;

        assert_eq!(filters["query"].values(), vec!["road bike"]);
        assert_eq!(filters["min_price"].values(), vec!["100"]);
        assert_eq!(filters["condition"].values(), vec!["10", "20"]);
    }

    #[test]
    fn test_validate_requires_link_or_filters() {
        let toml_str = r#"
        [empty]
        name = "empty"
        refresh_rate = 60.0
        webhook_url = "https://hooks.example.com/abc"
        "#;
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        assert!(file["empty"].validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_rate() {
        let file: ConfigFile = toml::from_str(minimal_toml()).unwrap();
        let mut config = file["bikes"].clone();
        config.refresh_rate = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_index_path_per_config_and_mode() {
        let file: ConfigFile = toml::from_str(minimal_toml()).unwrap();
        let config = &file["bikes"];

        let path = config.index_path(Path::new("cards/Bikes.toml"), "bikes");
        assert_eq!(path, PathBuf::from("data/bikes_bikes.idx"));
    }
}
