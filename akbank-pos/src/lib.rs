//! Akbank virtual POS client.
//!
//! A Rust client for the Akbank virtual POS payment gateway. It builds
//! transaction requests, authenticates them with HMAC-SHA512 and either posts
//! them to the direct JSON API or renders the self-submitting page of the
//! 3-D Secure browser flow.
//!
//! # What does it cover?
//!
//! - **Direct API**: sale, pre-authorization, capture, refund and cancel,
//!   including sales that complete a prior 3-D Secure authentication
//! - **3-D Secure model**: signed HTML forms the card holder's browser posts to
//!   the gateway, as a base64 page or as a [`RedirectForm`] to render yourself
//! - **Exact wire encoding**: two-decimal amounts, numeric currency codes, the
//!   gateway's field presence rules and signing order
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   setters    ┌────────────────┐
//! │  VirtualPos  │─────────────▶│ PaymentRequest │
//! └──────┬───────┘              └───────┬────────┘
//!        │ stamp txnCode, time, nonce   │
//!        ├──────────────┬───────────────┘
//!        ▼              ▼
//!   JSON body      FormEncoding (ordered)
//!        │              │
//!   HMAC-SHA512    HMAC-SHA512 over field list
//!   auth-hash           │
//!        │              ▼
//!        ▼         RedirectForm ──▶ HTML page (base64)
//!  HttpTransport
//!        │
//!        ▼
//!  GatewayResponse | PosError
//! ```
//!
//! # Quick Start
//!
//! ## 1. Direct sale
//!
//! ```rust,no_run
//! use akbank_pos::VirtualPos;
//!
//! # async fn example() -> akbank_pos::error::Result<()> {
//! let pos = VirtualPos::new("MERCHANT-SAFE-ID", "TERMINAL-SAFE-ID", "secret", "TEST")?;
//!
//! let mut request = pos.request();
//! request
//!     .set_card_number("4355084355084358")
//!     .set_card_expiry("12", "30")
//!     .set_card_code("000")
//!     .set_order_id("ORDER-1")
//!     .set_amount("99.90", "TRY")?;
//!
//! let response = pos.auth(request).await?;
//! println!("{} {}", response.response_code, response.response_message);
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. 3-D Secure redirect
//!
//! ```
//! use akbank_pos::VirtualPos;
//!
//! # fn example() -> akbank_pos::error::Result<()> {
//! let pos = VirtualPos::new("MERCHANT-SAFE-ID", "TERMINAL-SAFE-ID", "secret", "TEST")?;
//!
//! let mut request = pos.request();
//! request
//!     .set_lang("TR")
//!     .set_ok_url("https://shop.example/payment/ok")
//!     .set_fail_url("https://shop.example/payment/fail")
//!     .set_order_id("ORDER-2")
//!     .set_amount("99.90", "TRY")?;
//!
//! // serve the decoded page to the card holder's browser
//! let page = pos.auth_3d_html(request);
//! assert!(!page.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! See [`error::PosError`]. A declined transaction is not an error: check
//! [`GatewayResponse::is_approved`](model::GatewayResponse::is_approved).

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and wiremock"
)]

pub mod amount;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod redirect;
pub mod signer;
pub mod transport;

#[cfg(test)]
mod tests;

pub use amount::{Amount, Currency};
pub use client::{TxnCode, VirtualPos};
pub use config::{Endpoints, Environment, PosConfig};
pub use error::{PosError, Result};
pub use model::{GatewayResponse, PaymentRequest};
pub use redirect::RedirectForm;
