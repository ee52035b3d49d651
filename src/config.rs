//! Service configuration: TOML file with environment overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// USGS WBD MapServer query endpoint; `{layer}` is filled per request
pub const DEFAULT_SERVICE_URL: &str =
    "https://hydro.nationalmap.gov/arcgis/rest/services/wbd/MapServer/{layer}/query";

pub const ENV_SERVICE_URL: &str = "HUC_SERVICE_URL";
pub const ENV_SERVICE_TOKEN: &str = "HUC_SERVICE_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "HUC_TIMEOUT_SECS";
pub const ENV_CACHE_TTL_SECS: &str = "HUC_CACHE_TTL_SECS";
pub const ENV_CACHE_MAX_ENTRIES: &str = "HUC_CACHE_MAX_ENTRIES";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    pub url: String,
    /// Access token, sent upstream only
    pub token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    /// Unbounded when unset
    pub max_entries: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVICE_URL.to_string(),
            token: None,
            timeout_secs: 10,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 24 * 60 * 60,
            max_entries: None,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> chrono::Duration {
        // chrono caps durations at i64::MAX milliseconds
        let secs = i64::try_from(self.ttl_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        chrono::Duration::seconds(secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_env_from<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var(ENV_SERVICE_URL).filter(|v| !v.trim().is_empty()) {
            self.upstream.url = url.trim().to_string();
        }
        if let Some(token) = var(ENV_SERVICE_TOKEN) {
            let token = token.trim();
            self.upstream.token = (!token.is_empty()).then(|| token.to_string());
        }
        if let Some(secs) = var(ENV_TIMEOUT_SECS) {
            self.upstream.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_TIMEOUT_SECS, secs))?;
        }
        if let Some(secs) = var(ENV_CACHE_TTL_SECS) {
            self.cache.ttl_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_CACHE_TTL_SECS, secs))?;
        }
        if let Some(max) = var(ENV_CACHE_MAX_ENTRIES) {
            let max: usize = max
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_CACHE_MAX_ENTRIES, max))?;
            self.cache.max_entries = (max > 0).then_some(max);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.upstream.url, DEFAULT_SERVICE_URL);
        assert!(config.upstream.token.is_none());
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.cache.ttl_secs, 86_400);
        assert!(config.cache.max_entries.is_none());
        assert_eq!(config.server.listen, "0.0.0.0:3000");
    }

    #[test]
    fn test_empty_file_is_valid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"").unwrap();
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.upstream.url, DEFAULT_SERVICE_URL);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [upstream]
            url = "http://localhost:8080/{{layer}}/query"
            token = "secret"

            [cache]
            ttl_secs = 60
            max_entries = 1000

            [server]
            listen = "127.0.0.1:9000"
            "#
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.upstream.url, "http://localhost:8080/{layer}/query");
        assert_eq!(config.upstream.token.as_deref(), Some("secret"));
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.max_entries, Some(1000));
        assert_eq!(config.server.listen, "127.0.0.1:9000");
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(Config::load_from_file("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_from(vars(&[
                (ENV_SERVICE_URL, "http://example.test/query"),
                (ENV_SERVICE_TOKEN, "abc"),
                (ENV_TIMEOUT_SECS, "5"),
                (ENV_CACHE_TTL_SECS, "120"),
                (ENV_CACHE_MAX_ENTRIES, "10"),
            ]))
            .unwrap();

        assert_eq!(config.upstream.url, "http://example.test/query");
        assert_eq!(config.upstream.token.as_deref(), Some("abc"));
        assert_eq!(config.upstream.timeout_secs, 5);
        assert_eq!(config.cache.ttl_secs, 120);
        assert_eq!(config.cache.max_entries, Some(10));
    }

    #[test]
    fn test_blank_token_means_none() {
        let mut config = Config::default();
        config.upstream.token = Some("from-file".to_string());
        config
            .apply_env_from(vars(&[(ENV_SERVICE_TOKEN, "  ")]))
            .unwrap();
        assert!(config.upstream.token.is_none());
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_env_from(vars(&[(ENV_TIMEOUT_SECS, "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = UpstreamConfig::default();
        config.token = Some("hunter2".to_string());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
