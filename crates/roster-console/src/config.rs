//! Console configuration

use roster_query::{ListParams, QueryCache};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Console configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Phone filter propagation delay in milliseconds
    pub debounce_ms: u64,
    /// Order favorited users first
    pub favorites_first: bool,
    /// Users per page, left to the server when unset
    pub page_size: Option<u32>,
    /// Maximum cached query results
    pub cache_capacity: u64,
    /// Cached result lifetime in seconds, unbounded when unset
    pub cache_ttl_secs: Option<u64>,
    /// Default log filter directive
    pub log_filter: String,
}

impl ConsoleConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With debounce delay
    #[inline]
    #[must_use]
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// With favorites ordering
    #[inline]
    #[must_use]
    pub fn with_favorites_first(mut self, favorites_first: bool) -> Self {
        self.favorites_first = favorites_first;
        self
    }

    /// With page size
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With cache entry lifetime
    #[inline]
    #[must_use]
    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = Some(secs);
        self
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Parse from TOML text; missing keys take their defaults
    ///
    /// # Errors
    /// Returns [`ConfigError`] for malformed TOML or out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded console config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == Some(0) {
            return Err(ConfigError::Invalid {
                field: "page_size",
                reason: "must be positive".to_string(),
            });
        }
        if self.cache_ttl_secs == Some(0) {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Debounce delay
    #[inline]
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// List parameters for the user list controller
    #[must_use]
    pub fn list_params(&self) -> ListParams {
        ListParams {
            favorites_first: self.favorites_first,
            page_size: self.page_size,
        }
    }

    /// Query cache sized by this configuration
    #[must_use]
    pub fn build_cache(&self) -> QueryCache {
        match self.cache_ttl_secs {
            Some(secs) => QueryCache::with_ttl(self.cache_capacity, Duration::from_secs(secs)),
            None => QueryCache::new(self.cache_capacity),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            favorites_first: true,
            page_size: None,
            cache_capacity: 10_000,
            cache_ttl_secs: None,
            log_filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.list_params(), ListParams::default());
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ConsoleConfig::from_toml_str("debounce_ms = 100\npage_size = 50\n").unwrap();
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.page_size, Some(50));
        assert!(config.favorites_first);
        assert_eq!(config.cache_capacity, 10_000);
    }

    #[test]
    fn zero_page_size_rejected() {
        let err = ConsoleConfig::from_toml_str("page_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "page_size", .. }));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(matches!(
            ConsoleConfig::from_toml_str("debounce_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "favorites_first = false\nlog_filter = \"roster=debug\"").unwrap();

        let config = ConsoleConfig::load(file.path()).unwrap();
        assert!(!config.favorites_first);
        assert_eq!(config.log_filter, "roster=debug");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConsoleConfig::load("/nonexistent/roster.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/roster.toml"));
    }

    #[test]
    fn builders() {
        let config = ConsoleConfig::new()
            .with_debounce_ms(10)
            .with_favorites_first(false)
            .with_page_size(5)
            .with_cache_capacity(3)
            .with_cache_ttl_secs(60)
            .with_log_filter("warn");
        assert_eq!(config.debounce_ms, 10);
        assert_eq!(config.list_params().page_size, Some(5));
        assert_eq!(config.cache_ttl_secs, Some(60));
    }
}
