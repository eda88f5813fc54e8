//! Runtime configuration.
//!
//! Durations are written as humantime strings (`"15s"`, `"2m 30s"`).
//!
//! ```yaml
//! enabled: true
//! provider:
//!   type: anthropic
//!   config:
//!     base_url: https://api.anthropic.com/v1
//! model: claude-sonnet-4-5-20250514
//! max_tokens: 800
//! timeout: 15s
//! retry:
//!   max_attempts: 3
//!   min_delay: 500ms
//! budget:
//!   global_max_tokens: 20000
//!   per_operation_max_tokens: 8000
//! cache:
//!   max_entries: 1000
//!   ttl: 1h
//! circuit_breaker:
//!   failure_threshold: 3
//!   recovery_timeout: 30s
//!   success_threshold: 1
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::providers::CompletionConfig;
use crate::resilience::CircuitBreakerConfig;

/// Serde adapter for `Duration` as a humantime string.
pub(crate) mod duration_str {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(D::Error::custom)
    }
}

/// Which provider to build and its provider-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Passed verbatim to the provider factory
    #[serde(default)]
    pub config: JsonValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts after the first call, on rate limits only
    pub max_attempts: usize,

    #[serde(with = "duration_str")]
    pub min_delay: Duration,

    #[serde(with = "duration_str")]
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub global_max_tokens: u32,
    pub per_operation_max_tokens: u32,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            global_max_tokens: 20_000,
            per_operation_max_tokens: 8_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: u64,

    #[serde(with = "duration_str")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

/// Configuration for `EnhancedRewriter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// When false every call returns the rule-based output
    pub enabled: bool,

    pub provider: Option<ProviderConfig>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,

    /// Per-call timeout, retries included
    #[serde(with = "duration_str")]
    pub timeout: Duration,

    pub retry: RetryConfig,
    pub budget: BudgetConfig,
    pub cache: CacheConfig,
    pub circuit_breaker: CircuitBreakerConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: None,
            model: "claude-sonnet-4-5-20250514".to_string(),
            max_tokens: 800,
            temperature: 0.2,
            timeout: Duration::from_secs(15),
            retry: RetryConfig::default(),
            budget: BudgetConfig::default(),
            cache: CacheConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Completion settings sent with every provider call.
    pub fn completion(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
            prompt_caching: true,
        }
    }
}
