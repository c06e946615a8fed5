use std::time::Duration;

use crate::retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};

pub const DEFAULT_BASE_URL: &str = "https://api.drug-database.example/api/v1";
pub const DEFAULT_IMAGES_URL: &str = "https://images.drug-database.example";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Gateway settings, read once at startup and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub images_base_url: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            images_base_url: DEFAULT_IMAGES_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry: RetryPolicy::default(),
        }
    }
}

impl GatewayConfig {
    /// Load from the process environment, after applying a `.env` file if one exists.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("DRUG_DB_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let images_base_url = lookup("DRUG_DB_IMAGES_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGES_URL.to_string());
        let timeout_ms: u64 = lookup("DRUG_DB_TIMEOUT_MS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let max_attempts: u32 = lookup("DRUG_DB_MAX_RETRIES")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let base_delay_ms: u64 = lookup("DRUG_DB_RETRY_DELAY_MS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_BASE_DELAY.as_millis() as u64);

        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            images_base_url: images_base_url.trim().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_millis(timeout_ms),
            retry: RetryPolicy::new(max_attempts, Duration::from_millis(base_delay_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_lookup(lookup(&[]));
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.request_timeout, Duration::from_millis(30_000));
        assert_eq!(config.retry.max_attempts(), 3);
        assert_eq!(config.retry.base_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("DRUG_DB_BASE_URL", "http://localhost:8080/api/"),
            ("DRUG_DB_IMAGES_URL", "http://localhost:8081"),
            ("DRUG_DB_TIMEOUT_MS", "5000"),
            ("DRUG_DB_MAX_RETRIES", "5"),
            ("DRUG_DB_RETRY_DELAY_MS", "250"),
        ]));
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.images_base_url, "http://localhost:8081");
        assert_eq!(config.request_timeout, Duration::from_millis(5000));
        assert_eq!(config.retry, RetryPolicy::new(5, Duration::from_millis(250)));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("DRUG_DB_TIMEOUT_MS", "soon"),
            ("DRUG_DB_MAX_RETRIES", "-1"),
            ("DRUG_DB_BASE_URL", "  "),
        ]));
        assert_eq!(config.request_timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(config.retry.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_zero_attempts_still_makes_one() {
        let config = GatewayConfig::from_lookup(lookup(&[("DRUG_DB_MAX_RETRIES", "0")]));
        assert_eq!(config.retry.max_attempts(), 1);
    }
}
