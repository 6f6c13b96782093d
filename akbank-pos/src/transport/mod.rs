//! HTTP plumbing for direct API calls.
//!
//! The transport posts an already signed JSON body and returns the raw status
//! and body. Interpreting the answer is left to the caller, since the gateway
//! mixes transaction declines, error envelopes and unreadable bodies across
//! status codes.
//!
//! # Examples
//!
//! ```rust,no_run
//! use akbank_pos::transport::{HttpTransport, RequestContext};
//!
//! # async fn example() -> akbank_pos::error::Result<()> {
//! let transport = HttpTransport::new()?;
//!
//! let ctx = RequestContext {
//!     url: "https://apipre.akbank.com/api/v1/payment/virtualpos/transaction/process",
//!     headers: vec![("auth-hash", "c2lnbmF0dXJl")],
//!     content_type: Some("application/json"),
//! };
//!
//! let response = transport.post(ctx, br#"{"version":"1.00"}"#).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// Request context for transport operations.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    /// Absolute request URL.
    pub url: &'a str,
    /// Additional HTTP headers to include.
    pub headers: Vec<(&'a str, &'a str)>,
    /// Content-Type header value (if applicable).
    pub content_type: Option<&'a str>,
}

/// Raw answer of the gateway.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Returns `true` for HTTP 200.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
