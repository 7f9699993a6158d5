//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the client starts with zero
//! configuration; only catalog access needs `TMDB_API_KEY`.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use streamverse_catalog::CatalogConfig;
use streamverse_shared::constants::{PAYMENT_DELAY_MS, TRAILER_ROTATION_SECS};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Catalog endpoint, image CDN and API key.
    /// Env: `TMDB_API_KEY`, `TMDB_BASE_URL`, `TMDB_IMAGE_BASE_URL`,
    /// `STREAMVERSE_HTTP_TIMEOUT_SECS`
    pub catalog: CatalogConfig,

    /// Local database file.
    /// Env: `STREAMVERSE_DB_PATH`
    /// Default: `None` (platform data directory).
    pub db_path: Option<PathBuf>,

    /// Simulated payment processing time.
    /// Env: `STREAMVERSE_PAYMENT_DELAY_MS`
    /// Default: 2000 ms
    pub payment_delay: Duration,

    /// Hero trailer rotation period.
    /// Env: `STREAMVERSE_TRAILER_PERIOD_SECS`
    /// Default: 10 s
    pub trailer_period: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            db_path: None,
            payment_delay: Duration::from_millis(PAYMENT_DELAY_MS),
            trailer_period: Duration::from_secs(TRAILER_ROTATION_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(key) = lookup("TMDB_API_KEY") {
            config.catalog.api_key = key;
        }

        if let Some(url) = lookup("TMDB_BASE_URL") {
            config.catalog.base_url = url;
        }

        if let Some(url) = lookup("TMDB_IMAGE_BASE_URL") {
            config.catalog.image_base_url = url;
        }

        if let Some(secs) = parse_var::<u64>(&lookup, "STREAMVERSE_HTTP_TIMEOUT_SECS") {
            config.catalog.timeout = Duration::from_secs(secs);
        }

        if let Some(path) = lookup("STREAMVERSE_DB_PATH") {
            if !path.trim().is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(ms) = parse_var::<u64>(&lookup, "STREAMVERSE_PAYMENT_DELAY_MS") {
            config.payment_delay = Duration::from_millis(ms);
        }

        match parse_var::<u64>(&lookup, "STREAMVERSE_TRAILER_PERIOD_SECS") {
            Some(0) => tracing::warn!("STREAMVERSE_TRAILER_PERIOD_SECS must be positive, using default"),
            Some(secs) => config.trailer_period = Duration::from_secs(secs),
            None => {}
        }

        config
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "Invalid value, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.payment_delay, Duration::from_millis(2000));
        assert_eq!(config.trailer_period, Duration::from_secs(10));
        assert_eq!(config.catalog.base_url, "https://api.themoviedb.org/3");
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("TMDB_API_KEY", "k"),
            ("STREAMVERSE_DB_PATH", "/tmp/sv.db"),
            ("STREAMVERSE_PAYMENT_DELAY_MS", "0"),
            ("STREAMVERSE_HTTP_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(config.catalog.api_key, "k");
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/sv.db")));
        assert_eq!(config.payment_delay, Duration::ZERO);
        assert_eq!(config.catalog.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = from_pairs(&[
            ("STREAMVERSE_PAYMENT_DELAY_MS", "soon"),
            ("STREAMVERSE_TRAILER_PERIOD_SECS", "0"),
        ]);
        assert_eq!(config.payment_delay, Duration::from_millis(2000));
        assert_eq!(config.trailer_period, Duration::from_secs(10));
    }
}
