//! Pool store configuration.

use std::env;

/// Pool store configuration
#[derive(Debug, Clone)]
pub struct PoolStoreConfig {
    /// Pools endpoint, e.g. `https://sealeddeck.tech/api/pools`
    pub base_url: String,

    /// Attempts per call before giving up (at least 1)
    pub max_attempts: u32,

    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,

    /// Base of the public pool links written to the ledger
    pub link_base: String,
}

impl PoolStoreConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `POOL_STORE_URL`: Pools endpoint (default: `https://sealeddeck.tech/api/pools`)
    /// - `POOL_STORE_MAX_ATTEMPTS`: Attempts per call (default: 3)
    /// - `POOL_STORE_TIMEOUT_SECS`: Per-request timeout (default: 10)
    /// - `POOL_LINK_BASE`: Public link base (default: `https://sealeddeck.tech`)
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("POOL_STORE_URL").unwrap_or(defaults.base_url),
            max_attempts: env::var("POOL_STORE_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_attempts),
            request_timeout_secs: env::var("POOL_STORE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            link_base: env::var("POOL_LINK_BASE").unwrap_or(defaults.link_base),
        }
    }
}

impl Default for PoolStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sealeddeck.tech/api/pools".to_string(),
            max_attempts: 3,
            request_timeout_secs: 10,
            link_base: "https://sealeddeck.tech".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_overrides_and_fallbacks() {
        // SAFETY: serialised with every other test touching the environment
        unsafe {
            env::set_var("POOL_STORE_URL", "http://localhost:9000/api/pools");
            env::set_var("POOL_STORE_MAX_ATTEMPTS", "not-a-number");
        }

        let config = PoolStoreConfig::from_env();
        assert_eq!(config.base_url, "http://localhost:9000/api/pools");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.link_base, "https://sealeddeck.tech");

        unsafe {
            env::remove_var("POOL_STORE_URL");
            env::remove_var("POOL_STORE_MAX_ATTEMPTS");
        }
    }
}
