//! HMAC-SHA512 request authentication.
//!
//! The gateway authenticates requests with two schemes sharing one key:
//!
//! - **Payload signature**: HMAC-SHA512 over the exact JSON body bytes, sent in
//!   the `auth-hash` header of direct API calls
//! - **Ordered-field signature**: HMAC-SHA512 over the concatenation of a fixed,
//!   ordered list of form field values, sent as the `hash` form field of the
//!   3-D Secure model
//!
//! Both produce the standard (padded) base64 encoding of the 64-byte MAC.
//!
//! # Security
//!
//! - [`SecretKey`] zeroizes its bytes on drop; the signer keeps only the keyed
//!   HMAC state
//! - `Debug` output never includes the key
//! - Verification compares MACs in constant time

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

use crate::{
    error::{PosError, Result},
    form::FormEncoding,
};

type HmacSha512 = Hmac<Sha512>;

/// Form fields covered by the 3-D Secure signature, in signing order.
///
/// The gateway recomputes the signature over the same list; a field absent
/// from the form contributes an empty string.
pub const THREE_D_HASH_FIELDS: [&str; 22] = [
    "paymentModel",
    "txnCode",
    "merchantSafeId",
    "terminalSafeId",
    "orderId",
    "lang",
    "amount",
    "ccbRewardAmount",
    "pcbRewardAmount",
    "xcbRewardAmount",
    "currencyCode",
    "installCount",
    "okUrl",
    "failUrl",
    "emailAddress",
    "subMerchantId",
    "creditCard",
    "expiredDate",
    "cvv",
    "randomNumber",
    "requestDateTime",
    "b2bIdentityNumber",
];

/// Shared secret issued by the bank for a terminal.
#[derive(Clone)]
pub struct SecretKey(Zeroizing<Vec<u8>>);

impl SecretKey {
    /// Wraps the raw key bytes.
    #[must_use]
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(key.into()))
    }

    /// Returns `true` if the key has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

impl From<&str> for SecretKey {
    fn from(key: &str) -> Self {
        Self::new(key.as_bytes())
    }
}

impl From<String> for SecretKey {
    fn from(key: String) -> Self {
        Self::new(key.into_bytes())
    }
}

/// Computes and verifies gateway signatures.
///
/// # Examples
///
/// ```
/// use akbank_pos::signer::PosSigner;
///
/// # fn example() -> akbank_pos::error::Result<()> {
/// let signer = PosSigner::new("secret")?;
/// let signature = signer.sign_payload(br#"{"txnCode":"1000"}"#);
/// assert_eq!(signature.len(), 88);
/// assert!(signer.verify_payload(br#"{"txnCode":"1000"}"#, &signature));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PosSigner {
    keyed: HmacSha512,
}

impl std::fmt::Debug for PosSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosSigner").field("key", &"[REDACTED]").finish()
    }
}

impl PosSigner {
    /// Creates a signer.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::MissingSecretKey`] if the key is empty.
    pub fn new(key: impl Into<SecretKey>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(PosError::MissingSecretKey);
        }
        let keyed = HmacSha512::new_from_slice(key.expose())
            .map_err(|e| PosError::InvalidConfig(format!("secret key rejected: {e}")))?;
        Ok(Self { keyed })
    }

    /// Signs the exact bytes of a request body.
    ///
    /// The body must not be re-serialized after signing: the gateway checks the
    /// signature against the bytes it receives.
    #[must_use]
    #[instrument(skip(self, payload), fields(payload_len = payload.len()))]
    pub fn sign_payload(&self, payload: &[u8]) -> String {
        let mut mac = self.mac();
        mac.update(payload);
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Signs the concatenated values of `fields`, read from `form` in the given order.
    ///
    /// A field missing from the form contributes nothing, exactly like an
    /// empty value.
    #[must_use]
    #[instrument(skip(self, form), fields(field_count = fields.len()))]
    pub fn sign_fields(&self, form: &FormEncoding, fields: &[&str]) -> String {
        let mut mac = self.mac();
        for name in fields {
            mac.update(form.value_or_empty(name).as_bytes());
        }
        debug!("signed form fields");
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Signs a 3-D Secure form over [`THREE_D_HASH_FIELDS`].
    #[must_use]
    pub fn sign_three_d(&self, form: &FormEncoding) -> String {
        self.sign_fields(form, &THREE_D_HASH_FIELDS)
    }

    /// Checks a base64 payload signature in constant time.
    #[must_use]
    pub fn verify_payload(&self, payload: &[u8], signature: &str) -> bool {
        let Ok(expected) = STANDARD.decode(signature.trim()) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(payload);
        mac.verify_slice(&expected).is_ok()
    }

    /// Checks a base64 ordered-field signature in constant time.
    ///
    /// Used for the signed parameters the gateway posts back to the merchant's
    /// return URLs.
    #[must_use]
    pub fn verify_fields(&self, form: &FormEncoding, fields: &[&str], signature: &str) -> bool {
        let Ok(expected) = STANDARD.decode(signature.trim()) else {
            return false;
        };
        let mut mac = self.mac();
        for name in fields {
            mac.update(form.value_or_empty(name).as_bytes());
        }
        mac.verify_slice(&expected).is_ok()
    }

    fn mac(&self) -> HmacSha512 {
        self.keyed.clone()
    }
}
