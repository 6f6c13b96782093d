//! Transaction dispatch.
//!
//! [`VirtualPos`] is configured once per terminal and shared freely: it holds
//! only immutable state (identifiers, signer, endpoints and a pooled HTTP
//! client) and every operation takes `&self`.
//!
//! Each operation stamps the request with its transaction code, the current
//! UTC time and a fresh nonce, then either
//!
//! - signs the JSON body and posts it to the direct API (`auth`, `refund`, ...), or
//! - projects it into the 3-D Secure form, signs the ordered field list and
//!   returns a self-submitting page for the browser (`auth_3d_html`, ...).
//!
//! # Examples
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
//!     .set_customer_ipv4("203.0.113.10")
//!     .set_amount("10.5", "TRY")?;
//!
//! let response = pos.auth(request).await?;
//! if response.is_approved() {
//!     println!("approved: {:?}", response.auth_code());
//! } else {
//!     println!("declined: {}", response.response_message);
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;

use chrono::Utc;
use rand::{RngCore, rngs::OsRng};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    config::{Endpoints, Environment, PosConfig},
    error::{PosError, Result},
    form::FormEncoding,
    model::{API_VERSION, GatewayError, GatewayResponse, PaymentRequest, Terminal, Transaction},
    redirect::RedirectForm,
    signer::{PosSigner, SecretKey},
    transport::{HttpTransport, RequestContext, TransportResponse},
};

/// Timestamp format of `requestDateTime`.
pub const REQUEST_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Payment model of the 3-D Secure form.
pub const THREE_D_PAYMENT_MODEL: &str = "3D";

/// Header carrying the payload signature.
pub const AUTH_HASH_HEADER: &str = "auth-hash";

/// Number of random bytes in a nonce; rendered as twice as many hex digits.
const NONCE_BYTES: usize = 64;

/// Transaction-type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxnCode {
    /// Sale, also used for a sale completed after 3-D Secure authentication.
    Sale,
    /// Pre-authorization.
    PreAuth,
    /// Capture of a pre-authorization.
    PostAuth,
    /// Refund of a settled sale.
    Refund,
    /// Cancel (void) of a same-day transaction.
    Cancel,
    /// Sale through the 3-D Secure form.
    ThreeDSale,
    /// Pre-authorization through the 3-D Secure form.
    ThreeDPreAuth,
}

impl TxnCode {
    /// Returns the wire code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sale => "1000",
            Self::Refund => "1002",
            Self::Cancel => "1003",
            Self::PreAuth => "1004",
            Self::PostAuth => "1005",
            Self::ThreeDSale => "3000",
            Self::ThreeDPreAuth => "3004",
        }
    }
}

impl fmt::Display for TxnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Akbank virtual POS client for one terminal.
#[derive(Debug, Clone)]
pub struct VirtualPos {
    merchant_safe_id: String,
    terminal_safe_id: String,
    signer: PosSigner,
    endpoints: Endpoints,
    transport: HttpTransport,
}

impl VirtualPos {
    /// Creates a client for the named environment (`TEST` or `PROD`).
    ///
    /// # Errors
    ///
    /// Returns [`PosError::UnknownEnvironment`] for an unknown environment name,
    /// [`PosError::MissingSecretKey`] for an empty key and
    /// [`PosError::HttpError`] if the HTTP client cannot be created.
    ///
    /// # Examples
    ///
    /// ```
    /// use akbank_pos::{VirtualPos, error::PosError};
    ///
    /// assert!(VirtualPos::new("M1", "T1", "K", "TEST").is_ok());
    /// assert!(matches!(VirtualPos::new("M1", "T1", "K", "DEV"), Err(PosError::UnknownEnvironment(_))));
    /// assert!(matches!(VirtualPos::new("M1", "T1", "", "TEST"), Err(PosError::MissingSecretKey)));
    /// ```
    pub fn new(
        merchant_safe_id: impl Into<String>,
        terminal_safe_id: impl Into<String>,
        secret_key: impl Into<SecretKey>,
        environment: &str,
    ) -> Result<Self> {
        let environment: Environment = environment.parse()?;
        Ok(Self {
            merchant_safe_id: merchant_safe_id.into(),
            terminal_safe_id: terminal_safe_id.into(),
            signer: PosSigner::new(secret_key)?,
            endpoints: environment.endpoints(),
            transport: HttpTransport::new()?,
        })
    }

    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate, or
    /// [`PosError::HttpError`] if the HTTP client cannot be created.
    pub fn from_config(config: &PosConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            merchant_safe_id: config.merchant_safe_id.clone(),
            terminal_safe_id: config.terminal_safe_id.clone(),
            signer: PosSigner::new(config.secret_key.clone())?,
            endpoints: config.environment.endpoints(),
            transport: HttpTransport::with_config(&config.http)?,
        })
    }

    /// Replaces the gateway endpoints, e.g. to target a local simulator.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Replaces the HTTP transport.
    #[must_use]
    pub fn with_transport(mut self, transport: HttpTransport) -> Self {
        self.transport = transport;
        self
    }

    /// Returns the active endpoints.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Returns the signer, e.g. to verify gateway callbacks.
    #[must_use]
    pub const fn signer(&self) -> &PosSigner {
        &self.signer
    }

    /// Creates a request pre-filled with API version and terminal identity.
    #[must_use]
    pub fn request(&self) -> PaymentRequest {
        PaymentRequest::new(self.merchant_safe_id.clone(), self.terminal_safe_id.clone())
    }

    /// Sale.
    ///
    /// A declined sale is returned as a normal [`GatewayResponse`].
    ///
    /// # Errors
    ///
    /// Returns transport errors and [`PosError::Gateway`] when the gateway
    /// answers with an error envelope.
    pub async fn auth(&self, request: PaymentRequest) -> Result<GatewayResponse> {
        self.dispatch(request, TxnCode::Sale, true).await
    }

    /// Pre-authorization.
    ///
    /// # Errors
    ///
    /// See [`auth`](Self::auth).
    pub async fn pre_auth(&self, request: PaymentRequest) -> Result<GatewayResponse> {
        self.dispatch(request, TxnCode::PreAuth, true).await
    }

    /// Sale completing a 3-D Secure authentication.
    ///
    /// Attach the authentication result first with
    /// [`PaymentRequest::set_secure_transaction`].
    ///
    /// # Errors
    ///
    /// See [`auth`](Self::auth).
    pub async fn auth_3d(&self, request: PaymentRequest) -> Result<GatewayResponse> {
        self.dispatch(request, TxnCode::Sale, true).await
    }

    /// Pre-authorization completing a 3-D Secure authentication.
    ///
    /// # Errors
    ///
    /// See [`auth`](Self::auth).
    pub async fn pre_auth_3d(&self, request: PaymentRequest) -> Result<GatewayResponse> {
        self.dispatch(request, TxnCode::PreAuth, true).await
    }

    /// Capture of a pre-authorization.
    ///
    /// # Errors
    ///
    /// See [`auth`](Self::auth).
    pub async fn post_auth(&self, request: PaymentRequest) -> Result<GatewayResponse> {
        self.dispatch(request, TxnCode::PostAuth, false).await
    }

    /// Refund.
    ///
    /// # Errors
    ///
    /// See [`auth`](Self::auth).
    pub async fn refund(&self, request: PaymentRequest) -> Result<GatewayResponse> {
        self.dispatch(request, TxnCode::Refund, false).await
    }

    /// Cancel.
    ///
    /// # Errors
    ///
    /// See [`auth`](Self::auth).
    pub async fn cancel(&self, request: PaymentRequest) -> Result<GatewayResponse> {
        self.dispatch(request, TxnCode::Cancel, false).await
    }

    /// Base64 encoded self-submitting 3-D Secure sale page.
    ///
    /// Never touches the network.
    #[must_use]
    pub fn auth_3d_html(&self, request: PaymentRequest) -> String {
        self.auth_3d_form(request).encode()
    }

    /// Base64 encoded self-submitting 3-D Secure pre-authorization page.
    #[must_use]
    pub fn pre_auth_3d_html(&self, request: PaymentRequest) -> String {
        self.pre_auth_3d_form(request).encode()
    }

    /// Signed 3-D Secure sale form, for callers rendering the page themselves.
    #[must_use]
    pub fn auth_3d_form(&self, request: PaymentRequest) -> RedirectForm {
        self.three_d_form(request, TxnCode::ThreeDSale)
    }

    /// Signed 3-D Secure pre-authorization form.
    #[must_use]
    pub fn pre_auth_3d_form(&self, request: PaymentRequest) -> RedirectForm {
        self.three_d_form(request, TxnCode::ThreeDPreAuth)
    }

    fn stamp(&self, request: &mut PaymentRequest, code: TxnCode) {
        let terminal = request.terminal.get_or_insert_with(Terminal::default);
        fill_blank(&mut terminal.merchant_safe_id, &self.merchant_safe_id);
        fill_blank(&mut terminal.terminal_safe_id, &self.terminal_safe_id);
        fill_blank(&mut request.version, API_VERSION);
        request.txn_code = Some(code.code().to_owned());
        request.request_date_time = Some(request_date_time());
        request.random_number = Some(random_number());
    }

    #[instrument(skip(self, request), fields(txn_code = %code))]
    fn three_d_form(&self, mut request: PaymentRequest, code: TxnCode) -> RedirectForm {
        self.stamp(&mut request, code);
        request.payment_model = Some(THREE_D_PAYMENT_MODEL.to_owned());
        request.hash = None;

        let unsigned = FormEncoding::project(&request);
        request.hash = Some(self.signer.sign_three_d(&unsigned));

        let fields = FormEncoding::project(&request);
        debug!(field_count = fields.len(), "built 3-D Secure form");
        RedirectForm::new(self.endpoints.secure.clone(), fields)
    }

    #[instrument(skip(self, request), fields(txn_code = %code))]
    async fn dispatch(
        &self,
        mut request: PaymentRequest,
        code: TxnCode,
        moto: bool,
    ) -> Result<GatewayResponse> {
        self.stamp(&mut request, code);
        if moto {
            request.transaction.get_or_insert_with(Transaction::default).moto_ind = Some(0);
        }

        // the gateway checks the hash against these exact bytes
        let body = serde_json::to_vec(&request)?;
        let hash = self.signer.sign_payload(&body);

        let url = self.endpoints.transaction_url();
        let ctx = RequestContext {
            url: &url,
            headers: vec![(AUTH_HASH_HEADER, hash.as_str())],
            content_type: Some("application/json"),
        };

        let response = self.transport.post(ctx, &body).await?;
        decode_response(&response)
    }
}

fn fill_blank(slot: &mut Option<String>, value: &str) {
    if slot.as_deref().is_none_or(str::is_empty) {
        *slot = Some(value.to_owned());
    }
}

/// Current UTC time in the gateway's `requestDateTime` format.
#[must_use]
pub fn request_date_time() -> String {
    Utc::now().format(REQUEST_DATE_TIME_FORMAT).to_string()
}

/// Fresh nonce of 128 upper-case hex digits from the OS random source.
#[must_use]
pub fn random_number() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

/// Interprets a raw gateway answer.
///
/// # Errors
///
/// - HTTP 200 whose body carries an error envelope: [`PosError::Gateway`]
/// - HTTP 200 with an undecodable body: [`PosError::Serialization`]
/// - any other status with a readable error envelope: [`PosError::Gateway`]
/// - any other status: [`PosError::UnexpectedStatus`]
pub fn decode_response(response: &TransportResponse) -> Result<GatewayResponse> {
    let status = response.status;

    if response.is_ok() {
        let decoded: GatewayResponse = serde_json::from_slice(&response.body)?;
        if let Some(error) = decoded.embedded_error() {
            warn!(
                status,
                code = %error.code,
                message = %error.message,
                "gateway returned an error"
            );
            return Err(PosError::Gateway { status, error: error.clone() });
        }
        debug!(
            response_code = %decoded.response_code,
            approved = decoded.is_approved(),
            "transaction answered"
        );
        return Ok(decoded);
    }

    match decode_error(&response.body) {
        Some(error) => {
            warn!(
                status,
                code = %error.code,
                message = %error.message,
                "gateway returned an error"
            );
            Err(PosError::Gateway { status, error })
        }
        None => {
            warn!(status, "gateway returned an unreadable error");
            Err(PosError::UnexpectedStatus { status, body: response.body_text() })
        }
    }
}

fn decode_error(body: &[u8]) -> Option<GatewayError> {
    #[derive(Deserialize)]
    struct Envelope {
        error: GatewayError,
    }

    if let Ok(Envelope { error }) = serde_json::from_slice::<Envelope>(body)
        && error.is_set()
    {
        return Some(error);
    }
    serde_json::from_slice::<GatewayError>(body).ok().filter(GatewayError::is_set)
}
