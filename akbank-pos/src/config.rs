//! Merchant configuration and gateway environments.
//!
//! A terminal is identified by its merchant safe id and terminal safe id and
//! authenticated with the secret key issued by the bank. The environment
//! selects the gateway host pair.
//!
//! # Examples
//!
//! ```
//! use akbank_pos::config::{Environment, PosConfig};
//!
//! let config = PosConfig::from_toml(
//!     r#"
//!     merchant_safe_id = "2023090417500272654BD9A49CF07574"
//!     terminal_safe_id = "2023090417500284633D137A249DBBEB"
//!     secret_key = "3230323330393034313735303032363031353172675f357637355f3273387373745f7233725f73323333383737335f323272383774767276327672323531355f"
//!     environment = "TEST"
//!
//!     [http]
//!     timeout_secs = 30
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.environment, Environment::Test);
//! assert_eq!(config.http.timeout_secs, 30);
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer};

use crate::{
    error::{PosError, Result},
    signer::SecretKey,
    transport::HttpConfig,
};

/// Path of the direct transaction API, relative to the API host.
pub const TRANSACTION_PATH: &str = "/api/v1/payment/virtualpos/transaction/process";

/// Gateway environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Pre-production gateway.
    Test,
    /// Production gateway.
    Prod,
}

impl Environment {
    /// Returns the endpoints of this environment.
    #[must_use]
    pub fn endpoints(self) -> Endpoints {
        match self {
            Self::Test => Endpoints::new(
                "https://apipre.akbank.com",
                "https://virtualpospaymentgatewaypre.akbank.com/securepay",
            ),
            Self::Prod => Endpoints::new(
                "https://api.akbank.com",
                "https://virtualpospaymentgateway.akbank.com/securepay",
            ),
        }
    }
}

impl FromStr for Environment {
    type Err = PosError;

    /// Parses an environment name. The 3-D Secure aliases `TEST3D` and
    /// `PROD3D` name the same environments.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TEST" | "TEST3D" => Ok(Self::Test),
            "PROD" | "PROD3D" => Ok(Self::Prod),
            _ => Err(PosError::UnknownEnvironment(s.to_owned())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Test => "TEST",
            Self::Prod => "PROD",
        })
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Gateway base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Base URL of the direct JSON API.
    pub api: String,
    /// URL the 3-D Secure form posts to.
    pub secure: String,
}

impl Endpoints {
    /// Creates endpoints from explicit URLs, e.g. for a local gateway simulator.
    #[must_use]
    pub fn new(api: impl Into<String>, secure: impl Into<String>) -> Self {
        Self { api: api.into(), secure: secure.into() }
    }

    /// Returns the full URL of the direct transaction API.
    #[must_use]
    pub fn transaction_url(&self) -> String {
        format!("{}{TRANSACTION_PATH}", self.api.trim_end_matches('/'))
    }
}

/// Merchant configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PosConfig {
    /// Merchant safe id issued by the bank.
    pub merchant_safe_id: String,
    /// Terminal safe id issued by the bank.
    pub terminal_safe_id: String,
    /// Shared secret key.
    #[serde(deserialize_with = "secret_key")]
    pub secret_key: SecretKey,
    /// Gateway environment.
    pub environment: Environment,
    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

impl PosConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::InvalidConfig`] for malformed TOML, missing fields or
    /// out-of-range HTTP settings, and [`PosError::MissingSecretKey`] for an
    /// empty secret key.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| PosError::InvalidConfig(e.message().to_owned()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks identifiers, key and HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.is_empty() {
            return Err(PosError::MissingSecretKey);
        }
        if self.merchant_safe_id.trim().is_empty() {
            return Err(PosError::InvalidConfig("merchant_safe_id must not be empty".to_owned()));
        }
        if self.terminal_safe_id.trim().is_empty() {
            return Err(PosError::InvalidConfig("terminal_safe_id must not be empty".to_owned()));
        }
        self.http.validate()
    }
}

fn secret_key<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<SecretKey, D::Error> {
    String::deserialize(deserializer).map(SecretKey::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
        merchant_safe_id = "M1"
        terminal_safe_id = "T1"
        secret_key = "K"
        environment = "PROD"
    "#;

    #[test]
    fn test_environment_names() {
        assert_eq!("TEST".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!("TEST3D".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Prod);
        assert_eq!("prod3d".parse::<Environment>().unwrap(), Environment::Prod);
    }

    #[test]
    fn test_unknown_environment_is_config_error() {
        let error = "STAGING".parse::<Environment>().unwrap_err();
        assert!(matches!(error, PosError::UnknownEnvironment(ref name) if name == "STAGING"));
        assert!(error.is_config());
    }

    #[test]
    fn test_environment_endpoints() {
        let test = Environment::Test.endpoints();
        assert_eq!(test.api, "https://apipre.akbank.com");
        assert_eq!(test.secure, "https://virtualpospaymentgatewaypre.akbank.com/securepay");
        assert_eq!(
            test.transaction_url(),
            "https://apipre.akbank.com/api/v1/payment/virtualpos/transaction/process"
        );

        let prod = Environment::Prod.endpoints();
        assert_eq!(prod.api, "https://api.akbank.com");
        assert_eq!(prod.secure, "https://virtualpospaymentgateway.akbank.com/securepay");
    }

    #[test]
    fn test_transaction_url_trims_trailing_slash() {
        let endpoints = Endpoints::new("http://127.0.0.1:9000/", "http://127.0.0.1:9000/securepay");
        assert_eq!(
            endpoints.transaction_url(),
            "http://127.0.0.1:9000/api/v1/payment/virtualpos/transaction/process"
        );
    }

    #[test]
    fn test_config_from_toml_uses_http_defaults() {
        let config = PosConfig::from_toml(CONFIG).unwrap();
        assert_eq!(config.merchant_safe_id, "M1");
        assert_eq!(config.terminal_safe_id, "T1");
        assert_eq!(config.environment, Environment::Prod);
        assert_eq!(config.http, HttpConfig::default());
    }

    #[test]
    fn test_config_debug_hides_secret() {
        let config = PosConfig::from_toml(CONFIG).unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("secret_key: \"K\""));
    }

    #[test]
    fn test_config_unknown_environment() {
        let raw = CONFIG.replace("PROD", "STAGING");
        let error = PosConfig::from_toml(&raw).unwrap_err();
        assert!(matches!(
            error,
            PosError::InvalidConfig(ref message) if message.contains("STAGING")
        ));
    }

    #[test]
    fn test_config_empty_secret_key() {
        let raw = CONFIG.replace(r#"secret_key = "K""#, r#"secret_key = """#);
        assert!(matches!(PosConfig::from_toml(&raw), Err(PosError::MissingSecretKey)));
    }

    #[test]
    fn test_config_missing_field() {
        let raw = CONFIG.replace(r#"terminal_safe_id = "T1""#, "");
        assert!(matches!(PosConfig::from_toml(&raw), Err(PosError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_invalid_http_section() {
        let raw = format!("{CONFIG}\n[http]\ntimeout_secs = 0\n");
        assert!(matches!(PosConfig::from_toml(&raw), Err(PosError::InvalidConfig(_))));
    }
}
