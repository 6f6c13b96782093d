//! Gateway answers.
//!
//! Every field is optional on the wire. Missing fields decode to their
//! defaults, and unknown fields are ignored so that additions on the gateway
//! side do not break decoding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::request::{
    B2b, Card, Order, PlannedDate, Recurring, Reward, SubMerchant, Terminal, Transaction,
};
use crate::amount::Amount;

/// Response code of an approved transaction.
pub const APPROVED_RESPONSE_CODE: &str = "VPS-0000";

/// Decoded gateway answer to a direct API transaction.
///
/// A declined transaction is a normal response: check [`is_approved`](Self::is_approved).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayResponse {
    /// Transaction code echoed back.
    pub txn_code: String,
    /// Gateway response code, [`APPROVED_RESPONSE_CODE`] on approval.
    pub response_code: String,
    /// Signature of the answer computed by the gateway.
    pub hash: String,
    /// Human readable response message.
    pub response_message: String,
    /// Response code of the issuer host.
    pub host_response_code: String,
    /// Message of the issuer host.
    pub host_message: String,
    /// Processing timestamp.
    pub txn_date_time: String,
    /// Merchant and terminal identity.
    pub terminal: Option<Terminal>,
    /// Masked card data.
    pub card: Option<Card>,
    /// Order identifiers.
    pub order: Option<Order>,
    /// Amount, authorization code and references.
    pub transaction: Option<Transaction>,
    /// Campaign applied by the issuer.
    pub campaign: Option<Campaign>,
    /// Reward usage and balances.
    pub reward: Option<Reward>,
    /// Recurring schedule.
    pub recurring: Option<Recurring>,
    /// Planned payment date.
    pub planned_date: Option<PlannedDate>,
    /// Interest applied to the installments.
    pub interest: Option<Interest>,
    /// Sub-merchant identity.
    pub sub_merchant: Option<SubMerchant>,
    /// Business-to-business data.
    pub b2b: Option<B2b>,
    /// Validity of a pay-by-link, in days.
    pub link_valid_term: Option<Decimal>,
    /// Numeric merchant id.
    pub merchant_id: Option<Decimal>,
    /// Expiry of a pay-by-link.
    pub link_expire_date: String,
    /// Merchant order id of a pay-by-link.
    pub merchant_order_id: String,
    /// Gateway reference id.
    pub reference_id: String,
    /// Pay-by-link token.
    pub token: String,
    /// Envelope header of batch style answers.
    pub header: Option<Header>,
    /// Pay-by-link details.
    pub link_detail: Option<LinkDetail>,
    /// Installment options available for the card.
    pub installment_condition_list: Vec<InstallmentCondition>,
    /// Transaction history entries of a query.
    pub txn_detail_list: Vec<TxnDetail>,
    /// Error envelope embedded in an otherwise successful answer.
    pub error: Option<GatewayError>,
}

impl GatewayResponse {
    /// Returns `true` if the gateway approved the transaction.
    ///
    /// # Examples
    ///
    /// ```
    /// use akbank_pos::model::GatewayResponse;
    ///
    /// let response: GatewayResponse =
    ///     serde_json::from_str(r#"{"responseCode":"VPS-0000","responseMessage":"BASARILI"}"#).unwrap();
    /// assert!(response.is_approved());
    /// ```
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.response_code == APPROVED_RESPONSE_CODE
    }

    /// Returns the authorization code, if the answer carries one.
    #[must_use]
    pub fn auth_code(&self) -> Option<&str> {
        self.transaction.as_ref().and_then(|t| t.auth_code.as_deref())
    }

    /// Returns the embedded error envelope if it holds a code or a message.
    #[must_use]
    pub fn embedded_error(&self) -> Option<&GatewayError> {
        self.error.as_ref().filter(|e| e.is_set())
    }
}

/// Structured error envelope of the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayError {
    /// Gateway error code.
    pub code: String,
    /// Gateway error message.
    pub message: String,
    /// Field level details.
    pub errors: Vec<GatewaySubError>,
}

impl GatewayError {
    /// Returns `true` if the envelope carries a code or a message.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.code.is_empty() || !self.message.is_empty()
    }
}

/// Field level error detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySubError {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Offending field, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Campaign applied by the issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Campaign {
    /// Installments added by the campaign.
    pub additional_install_count: Option<u32>,
    /// Deferred first payment date.
    pub defering_date: String,
    /// Deferral in months.
    pub defering_month: Option<u32>,
}

/// Interest applied to the installments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Interest {
    /// Interest rate in percent.
    pub interest_rate: Option<Decimal>,
    /// Interest amount.
    pub interest_amount: Option<Amount>,
}

/// Envelope header of batch style answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Header {
    /// Return code.
    pub return_code: String,
    /// Return message.
    pub return_message: String,
}

/// Pay-by-link details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkDetail {
    /// Delivery channel of the link.
    pub link_transfer_type: String,
    /// Phone number the link was sent to.
    pub mobile_phone_number: String,
    /// E-mail address the link was sent to.
    pub email: String,
    /// Validity of the link, in days.
    pub link_valid_term: Option<Decimal>,
    /// Amount to be paid through the link.
    pub amount: Option<Amount>,
    /// ISO 4217 numeric currency code.
    pub currency_code: Option<u16>,
    /// Installment count offered by the link.
    pub installment_count: Option<Decimal>,
    /// Gateway reference id of the link.
    pub reference_id: String,
    /// Error code reported for the link.
    pub error_code: String,
    /// Error message reported for the link.
    pub error_message: String,
    /// Expiry of the link.
    pub link_expire_date: String,
    /// Current status of the link.
    pub link_status: String,
    /// Numeric installment type.
    pub installment_type: Option<Decimal>,
}

/// Installment option available for a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstallmentCondition {
    /// Installment count.
    pub installment_count: Option<Decimal>,
    /// Installment type.
    pub installment_type: String,
    /// Card type the option applies to.
    pub card_type: String,
}

/// A transaction history entry.
///
/// Fields carry the same meaning as their counterparts in [`GatewayResponse`]
/// and the request sub-records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TxnDetail {
    /// Transaction code.
    pub txn_code: String,
    /// Gateway response code.
    pub response_code: String,
    /// Human readable response message.
    pub response_message: String,
    /// Response code of the issuer host.
    pub host_response_code: String,
    /// Message of the issuer host.
    pub host_message: String,
    /// Processing timestamp.
    pub txn_date_time: String,
    /// Planned processing timestamp.
    pub planned_date_time: String,
    /// Terminal safe id.
    pub terminal_safe_id: String,
    /// Merchant safe id.
    pub merchant_safe_id: String,
    /// Merchant order id.
    pub order_id: String,
    /// Order tracking id.
    pub order_track_id: String,
    /// Authorization code.
    pub auth_code: String,
    /// Retrieval reference number.
    pub rrn: String,
    /// Batch number.
    pub batch_number: Option<u32>,
    /// System trace audit number.
    pub stan: Option<u32>,
    /// Settlement id.
    pub settlement_id: String,
    /// Transaction status.
    pub txn_status: String,
    /// Transaction amount.
    pub amount: Option<Amount>,
    /// ISO 4217 numeric currency code.
    pub currency_code: Option<u16>,
    /// Mail or telephone order indicator.
    pub moto_ind: Option<u8>,
    /// Installment count.
    pub install_count: Option<u32>,
    /// CCB reward used.
    pub ccb_reward_amount: Option<Amount>,
    /// PCB reward used.
    pub pcb_reward_amount: Option<Amount>,
    /// XCB reward used.
    pub xcb_reward_amount: Option<Amount>,
    /// Pre-authorization status.
    pub pre_auth_status: String,
    /// Amount the pre-authorization was closed with.
    pub pre_auth_close_amount: Option<Amount>,
    /// Partially cancelled pre-authorization amount.
    pub pre_auth_partial_cancel_amount: Option<Amount>,
    /// Closing date of the pre-authorization.
    pub pre_auth_close_date: String,
    /// Masked card number.
    pub masked_card_number: String,
    /// Position in a recurring schedule.
    pub recurring_order: Option<u32>,
    /// Request type.
    pub request_type: String,
    /// Request status.
    pub request_status: String,
    /// Cancellation date.
    pub cancel_date: String,
    /// Number of attempts.
    pub try_count: Option<u32>,
    /// 3-D Secure transaction id.
    pub xid: String,
    /// Payment model.
    pub payment_model: String,
    /// Electronic commerce indicator.
    pub eci: String,
    /// 3-D Secure authentication data.
    pub secure_data: String,
    /// Order id of the original transaction.
    pub org_order_id: String,
}

impl TxnDetail {
    /// Returns `true` if this entry was approved.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.response_code == APPROVED_RESPONSE_CODE
    }
}
