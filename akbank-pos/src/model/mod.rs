//! Wire model of the gateway API.
//!
//! [`request`] holds the transaction request and its sub-records, [`response`]
//! the decoded gateway answer and the structured error envelope. All field
//! names follow the gateway's camelCase JSON naming.

pub mod request;
pub mod response;

pub use request::{
    B2b, Card, Customer, InsurancePan, Order, PayByLink, PaymentRequest, PlannedDate, Recurring,
    Reward, SecureTransaction, Sgk, SubMerchant, Terminal, Transaction,
};
pub use response::{
    APPROVED_RESPONSE_CODE, Campaign, GatewayError, GatewayResponse, GatewaySubError, Header,
    InstallmentCondition, Interest, LinkDetail, TxnDetail,
};

/// API version sent with every request.
pub const API_VERSION: &str = "1.00";

/// Serializers for fields the gateway expects even when unset.
pub(crate) mod always {
    use serde::Serializer;

    /// Serializes `None` as an empty string instead of omitting or nulling it.
    #[allow(clippy::ref_option, reason = "signature imposed by serde's serialize_with")]
    pub(crate) fn string<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or_default())
    }
}
