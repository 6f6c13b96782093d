//! HTTP client configuration.
//!
//! Deserializable from the `[http]` table of the POS configuration file.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{PosError, Result};

/// HTTP client configuration.
///
/// # Examples
///
/// ```toml
/// [http]
/// timeout_secs = 30
/// connect_timeout_secs = 10
/// http_version = "auto"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Maximum idle connections per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// HTTP version preference.
    #[serde(default)]
    pub http_version: HttpVersion,

    /// Value of the `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            http_version: HttpVersion::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    /// Validates configuration values are within acceptable bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::InvalidConfig`] if timeout values are outside valid ranges:
    /// - `timeout_secs`: must be 1-300 seconds
    /// - `connect_timeout_secs`: must be 1-60 seconds and not exceed `timeout_secs`
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(PosError::InvalidConfig(
                "timeout_secs must be between 1 and 300".to_owned(),
            ));
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 60 {
            return Err(PosError::InvalidConfig(
                "connect_timeout_secs must be between 1 and 60".to_owned(),
            ));
        }
        if self.connect_timeout_secs > self.timeout_secs {
            return Err(PosError::InvalidConfig(
                "connect_timeout_secs must not exceed timeout_secs".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns timeout as Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns connect timeout as Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// HTTP version preference.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    /// HTTP/1.1 only.
    Http1,
    /// HTTP/2 only (prior knowledge).
    Http2,
    /// Auto-negotiate (prefer HTTP/2, fall back to HTTP/1.1).
    #[default]
    Auto,
}

const fn default_pool_max_idle() -> usize {
    10
}

const fn default_timeout_secs() -> u64 {
    60
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_default() {
        let config = HttpConfig::default();
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.http_version, HttpVersion::Auto);
        assert!(config.user_agent.starts_with("akbank-pos/"));
        config.validate().unwrap();
    }

    #[test]
    fn test_http_config_timeout() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_http_config_from_toml() {
        let toml = "
            pool_max_idle_per_host = 20
            timeout_secs = 45
            connect_timeout_secs = 15
            http_version = \"http2\"
            user_agent = \"shop/1.0\"
        ";

        let config: HttpConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert_eq!(config.timeout_secs, 45);
        assert_eq!(config.connect_timeout_secs, 15);
        assert_eq!(config.http_version, HttpVersion::Http2);
        assert_eq!(config.user_agent, "shop/1.0");
    }

    #[test]
    fn test_http_config_with_defaults() {
        let config: HttpConfig = toml::from_str("timeout_secs = 20").unwrap();
        assert_eq!(config.pool_max_idle_per_host, 10); // default
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.connect_timeout_secs, 10); // default
        assert_eq!(config.http_version, HttpVersion::Auto); // default
    }

    #[test]
    fn test_http_config_empty_toml() {
        let config: HttpConfig = toml::from_str("").unwrap();
        assert_eq!(config, HttpConfig::default());
    }

    #[test]
    fn test_http_config_unknown_field_rejected() {
        let result: std::result::Result<HttpConfig, _> = toml::from_str("timeout = 5");
        assert!(result.is_err());
    }

    #[test]
    fn test_http_version_invalid_value() {
        let result: std::result::Result<HttpConfig, _> = toml::from_str("http_version = \"http3\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_http_version_all_variants() {
        let variants = [
            ("http1", HttpVersion::Http1),
            ("http2", HttpVersion::Http2),
            ("auto", HttpVersion::Auto),
        ];
        for (raw, expected) in variants {
            let config: HttpConfig = toml::from_str(&format!("http_version = \"{raw}\"")).unwrap();
            assert_eq!(config.http_version, expected);
        }
    }

    #[test]
    fn test_http_config_validate_timeout_bounds() {
        let mut config = HttpConfig { timeout_secs: 0, ..HttpConfig::default() };
        assert!(matches!(config.validate(), Err(PosError::InvalidConfig(_))));

        config.timeout_secs = 301;
        assert!(config.validate().is_err());

        config.timeout_secs = 300;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_config_validate_connect_timeout_bounds() {
        let mut config = HttpConfig { connect_timeout_secs: 0, ..HttpConfig::default() };
        assert!(config.validate().is_err());

        config.connect_timeout_secs = 61;
        assert!(config.validate().is_err());

        config.connect_timeout_secs = 5;
        config.timeout_secs = 4;
        assert!(config.validate().is_err());
    }
}
