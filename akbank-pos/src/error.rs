//! Error types for the virtual POS client.
//!
//! All fallible operations in this crate return [`Result<T>`], which uses
//! [`PosError`] as the error type.
//!
//! # Error Categories
//!
//! - **Configuration errors** ([`PosError::MissingSecretKey`],
//!   [`PosError::UnknownEnvironment`], [`PosError::InvalidConfig`]): detected before any
//!   network call is attempted
//! - **Transport errors** ([`PosError::HttpError`], [`PosError::InvalidEndpoint`],
//!   [`PosError::UnexpectedStatus`], [`PosError::Serialization`]): the request never produced a
//!   usable gateway answer
//! - **Gateway errors** ([`PosError::Gateway`]): the gateway answered with a structured error
//!   envelope
//! - **Input errors** ([`PosError::InvalidInput`]): a request setter rejected its argument
//!
//! A declined transaction is *not* an error. It decodes into a normal
//! [`GatewayResponse`](crate::model::GatewayResponse) which the caller inspects with
//! [`GatewayResponse::is_approved`](crate::model::GatewayResponse::is_approved).
//!
//! # Examples
//!
//! ```
//! use akbank_pos::error::{PosError, Result};
//!
//! fn require_key(key: &str) -> Result<&str> {
//!     if key.is_empty() {
//!         return Err(PosError::MissingSecretKey);
//!     }
//!     Ok(key)
//! }
//!
//! assert!(require_key("").is_err());
//! ```

use thiserror::Error;

use crate::model::GatewayError;

/// Result type alias for virtual POS operations.
pub type Result<T> = std::result::Result<T, PosError>;

/// Errors that can occur while building, signing or dispatching a transaction.
///
/// # Error Recovery
///
/// - **Configuration errors**: fix the merchant configuration; retrying cannot help
/// - **Transport errors** ([`HttpError`](Self::HttpError),
///   [`UnexpectedStatus`](Self::UnexpectedStatus)): the outcome of the transaction is unknown,
///   query the order before submitting it again
/// - **Gateway errors** ([`Gateway`](Self::Gateway)): inspect the gateway code and message
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum PosError {
    /// The shared secret key is empty.
    ///
    /// Both signing schemes key HMAC-SHA512 with the merchant secret, so no
    /// request can be authenticated without it.
    ///
    /// # Recovery
    ///
    /// Load the secret key issued by the bank for the terminal.
    #[error("configuration error: secret key is missing")]
    MissingSecretKey,

    /// The environment name does not match any known gateway environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use akbank_pos::error::PosError;
    ///
    /// let err = PosError::UnknownEnvironment("STAGING".to_owned());
    /// assert_eq!(err.to_string(), "configuration error: unknown environment 'STAGING'");
    /// ```
    #[error("configuration error: unknown environment '{0}'")]
    UnknownEnvironment(String),

    /// The configuration could not be parsed or holds out-of-range values.
    #[error("configuration error: {0}")]
    InvalidConfig(String),

    /// A request setter rejected its input (unparsable amount, installment, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The gateway endpoint URL is not usable.
    ///
    /// # Recovery
    ///
    /// Check the environment selection or the custom endpoints passed to the client.
    #[error("invalid gateway endpoint: {0}")]
    InvalidEndpoint(String),

    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: connection failures, DNS errors, TLS errors and
    /// timeouts configured through [`HttpConfig`](crate::transport::HttpConfig).
    ///
    /// # Recovery
    ///
    /// The transaction state is unknown. Query the order before submitting it again.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request body serialization or response decoding failed.
    #[error("JSON processing failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The gateway answered with a non-200 status and an unreadable body.
    #[error("gateway returned unexpected status {status}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body, lossily decoded as UTF-8.
        body: String,
    },

    /// The gateway answered with a structured error envelope.
    ///
    /// The display form is the gateway's own message.
    #[error("{}", .error.message)]
    Gateway {
        /// HTTP status code of the answer.
        status: u16,
        /// Decoded error envelope.
        error: GatewayError,
    },
}

impl PosError {
    /// Returns `true` for errors detected before any network call.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::MissingSecretKey | Self::UnknownEnvironment(_) | Self::InvalidConfig(_)
        )
    }

    /// Returns `true` when the gateway itself reported the failure.
    #[must_use]
    pub const fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }

    /// Returns the gateway error envelope, if any.
    #[must_use]
    pub const fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway { error, .. } => Some(error),
            _ => None,
        }
    }
}
