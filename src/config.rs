use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FeedConfig {
    /// Recipe search endpoint settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Durable key/value storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Behaviour after a failed page fetch
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Configuration for the recipe search endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Base URL of the recipe API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key (can also be set via SPOONACULAR_API_KEY)
    pub api_key: Option<String>,
    /// Recipes requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            page_size: default_page_size(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Configuration for persisted browser state
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file backing the key/value store
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Key holding the serialized filter criteria
    #[serde(default = "default_criteria_key")]
    pub criteria_key: String,
    /// Key holding the serialized favorite ids
    #[serde(default = "default_favorites_key")]
    pub favorites_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            criteria_key: default_criteria_key(),
            favorites_key: default_favorites_key(),
        }
    }
}

/// Retry behaviour for failed page fetches.
///
/// With `auto_attempts = 0` a failed page is only retried when the user or
/// the pagination trigger asks again.
#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    /// Extra attempts made after a failure
    #[serde(default)]
    pub auto_attempts: u32,
    /// Base delay between attempts in milliseconds (multiplied by the attempt number)
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            auto_attempts: 0,
            delay_ms: default_retry_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Wait before retry number `attempt` (1-based), growing linearly
    pub fn delay_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.delay_ms.saturating_mul(u64::from(attempt)))
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_page_size() -> u32 {
    12
}

fn default_timeout() -> u64 {
    30
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("recipe-feed-state.json")
}

fn default_criteria_key() -> String {
    "selectedFilters".to_string()
}

fn default_favorites_key() -> String {
    "favorites".to_string()
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl FeedConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_FEED__ prefix
    /// 2. recipe-feed.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_FEED__SOURCE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`FeedConfig::load`] for the precedence rules.
pub fn load_config() -> Result<FeedConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-feed").required(false))
        // Use double underscore for nested: RECIPE_FEED__SOURCE__PAGE_SIZE
        .add_source(
            Environment::with_prefix("RECIPE_FEED")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
