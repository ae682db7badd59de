//! Configuration for the dashboard navigator
//!
//! Settings are loaded from YAML and validated before anything connects.
//! The API key supports env-var indirection so config files can be
//! committed without secrets.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::navigator::NavigatorConfig;
use crate::retry::RetryPolicy;
use crate::types::{BackoffType, PrevPolicy, SearchMode, SortDirection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete navigator configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Store connection settings
    pub store: StoreConfig,

    /// Collection to traverse
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Records per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Sort direction over creation time
    #[serde(default)]
    pub sort_direction: SortDirection,

    /// Where free-text search is evaluated
    #[serde(default)]
    pub search_mode: SearchMode,

    /// How `prev()` obtains already-visited pages
    #[serde(default)]
    pub prev_policy: PrevPolicy,

    /// Retry settings
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_collection() -> String {
    "issues".to_string()
}

fn default_page_size() -> usize {
    25
}

// ============================================================================
// Store Config
// ============================================================================

/// Remote store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store API
    pub base_url: String,

    /// Inline API key (prefer `api_key_env`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Header name carrying the API key
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Rate limit settings; absent disables limiting
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimitConfig>,
}

fn default_api_key_header() -> String {
    "x-api-key".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_rate_limit() -> Option<RateLimitConfig> {
    Some(RateLimitConfig::default())
}

/// Rate limit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per second
    pub requests_per_second: u32,
    /// Burst size
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_burst() -> u32 {
    5
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 5,
            burst_size: 5,
        }
    }
}

// ============================================================================
// Retry Config
// ============================================================================

/// Retry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,

    /// Multiplier applied to quota-exhaustion delays
    #[serde(default = "default_quota_multiplier")]
    pub quota_multiplier: u32,
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    10_000
}

fn default_quota_multiplier() -> u32 {
    5
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            backoff: BackoffType::default(),
            quota_multiplier: default_quota_multiplier(),
        }
    }
}

// ============================================================================
// Loading and Validation
// ============================================================================

impl DashboardConfig {
    /// Load and validate a config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.store.base_url)?;

        if self.collection.is_empty() {
            return Err(Error::missing_field("collection"));
        }
        if self.page_size == 0 {
            return Err(Error::config("page_size must be at least 1"));
        }
        if self.store.timeout_ms == 0 {
            return Err(Error::config("store.timeout_ms must be at least 1"));
        }
        Ok(())
    }

    /// Resolve the API key, preferring the env indirection
    pub fn resolve_api_key(&self) -> Result<Option<String>> {
        if let Some(var) = &self.store.api_key_env {
            return match std::env::var(var) {
                Ok(value) => Ok(Some(value)),
                Err(_) => Err(Error::config(format!(
                    "environment variable '{var}' is not set"
                ))),
            };
        }
        Ok(self.store.api_key.clone())
    }

    /// Derive the HTTP transport config
    pub fn http_config(&self) -> Result<HttpClientConfig> {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.store.base_url)
            .api_key_header(&self.store.api_key_header)
            .timeout(Duration::from_millis(self.store.timeout_ms));

        if let Some(key) = self.resolve_api_key()? {
            builder = builder.api_key(key);
        }

        builder = match &self.store.rate_limit {
            Some(rl) => builder.rate_limit(RateLimiterConfig::new(
                rl.requests_per_second,
                rl.burst_size,
            )),
            None => builder.no_rate_limit(),
        };

        Ok(builder.build())
    }

    /// Derive the navigator config
    pub fn navigator_config(&self) -> NavigatorConfig {
        NavigatorConfig::new()
            .with_page_size(self.page_size)
            .with_sort_direction(self.sort_direction)
            .with_search_mode(self.search_mode)
            .with_prev_policy(self.prev_policy)
            .with_retry(self.retry.policy())
    }
}

impl RetryConfig {
    /// Convert to the runtime retry policy
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            backoff_type: self.backoff,
            quota_multiplier: self.quota_multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = "
store:
  base_url: https://store.example.com
";

    const FULL: &str = "
store:
  base_url: https://store.example.com
  api_key: inline-secret
  api_key_header: authorization
  timeout_ms: 5000
  rate_limit:
    requests_per_second: 2
    burst_size: 4
collection: executions
page_size: 50
sort_direction: asc
search_mode: client
prev_policy: cache_pages
retry:
  max_retries: 5
  initial_backoff_ms: 50
  max_backoff_ms: 2000
  backoff: linear
  quota_multiplier: 10
";

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = DashboardConfig::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.collection, "issues");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.sort_direction, SortDirection::Desc);
        assert_eq!(config.search_mode, SearchMode::Native);
        assert_eq!(config.prev_policy, PrevPolicy::Refetch);
        assert_eq!(config.retry.max_retries, 3);
        assert!(config.store.rate_limit.is_some());
    }

    #[test]
    fn test_full_config_round_trip() {
        let config = DashboardConfig::from_yaml(FULL).unwrap();
        assert_eq!(config.collection, "executions");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.sort_direction, SortDirection::Asc);
        assert_eq!(config.search_mode, SearchMode::Client);
        assert_eq!(config.prev_policy, PrevPolicy::CachePages);

        let policy = config.retry.policy();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.initial_backoff, Duration::from_millis(50));
        assert_eq!(policy.backoff_type, BackoffType::Linear);
        assert_eq!(policy.quota_multiplier, 10);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = DashboardConfig::from_yaml("store:\n  base_url: not a url\n").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let yaml = "
store:
  base_url: https://store.example.com
page_size: 0
";
        let err = DashboardConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_api_key_env_indirection() {
        let yaml = "
store:
  base_url: https://store.example.com
  api_key_env: CURSORNAV_TEST_KEY_UNSET
";
        let config = DashboardConfig::from_yaml(yaml).unwrap();
        assert!(config.resolve_api_key().is_err());

        std::env::set_var("CURSORNAV_TEST_KEY_SET", "from-env");
        let yaml = "
store:
  base_url: https://store.example.com
  api_key: inline
  api_key_env: CURSORNAV_TEST_KEY_SET
";
        let config = DashboardConfig::from_yaml(yaml).unwrap();
        // Env indirection wins over the inline key
        assert_eq!(config.resolve_api_key().unwrap().as_deref(), Some("from-env"));
    }

    #[test]
    fn test_http_config_derivation() {
        let config = DashboardConfig::from_yaml(FULL).unwrap();
        let http = config.http_config().unwrap();
        assert_eq!(http.base_url, "https://store.example.com");
        assert_eq!(http.api_key.as_deref(), Some("inline-secret"));
        assert_eq!(http.api_key_header, "authorization");
        assert_eq!(http.timeout, Duration::from_millis(5000));
        assert_eq!(
            http.rate_limit,
            Some(RateLimiterConfig::new(2, 4))
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav.yaml");
        std::fs::write(&path, FULL).unwrap();

        let config = DashboardConfig::from_path(&path).unwrap();
        assert_eq!(config.collection, "executions");
    }

    #[test]
    fn test_navigator_config_derivation() {
        let config = DashboardConfig::from_yaml(FULL).unwrap();
        let nav = config.navigator_config();
        assert_eq!(nav.page_size, 50);
        assert_eq!(nav.search_mode, SearchMode::Client);
        assert_eq!(nav.prev_policy, PrevPolicy::CachePages);
    }
}
