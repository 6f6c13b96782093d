//! Payment request records.
//!
//! Every leaf is optional. In the JSON body an unset field is omitted
//! entirely, except for the few fields the gateway always expects, which are
//! sent as empty strings. The form declarations of each record follow the
//! gateway's 3-D Secure field order.

use serde::{Deserialize, Serialize};

use super::always;
use crate::{
    amount::{Amount, Currency, currency_code},
    error::{PosError, Result},
    form::{FormEncoding, FormProjection, Presence},
};

/// Transaction request sent to the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// API version, `"1.00"`.
    #[serde(default, serialize_with = "always::string")]
    pub version: Option<String>,
    /// Names of the hashed items, for API versions that announce them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_items: Option<String>,
    /// Language of the 3-D Secure pages (`TR` or `EN`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Merchant URL the browser returns to after a successful 3-D Secure flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok_url: Option<String>,
    /// Merchant URL the browser returns to after a failed 3-D Secure flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_url: Option<String>,
    /// Transaction-type code, stamped at dispatch.
    #[serde(default, serialize_with = "always::string")]
    pub txn_code: Option<String>,
    /// Payment model, `"3D"` for the browser-redirect flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_model: Option<String>,
    /// Request timestamp, stamped at dispatch.
    #[serde(default, serialize_with = "always::string")]
    pub request_date_time: Option<String>,
    /// Per-request nonce, stamped at dispatch.
    #[serde(default, serialize_with = "always::string")]
    pub random_number: Option<String>,
    /// Institution code, for acquirer-level integrations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_code: Option<String>,
    /// Merchant and terminal identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<Terminal>,
    /// Card data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    /// Insurance PAN data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_pan: Option<InsurancePan>,
    /// Order identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    /// Reward point usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<Reward>,
    /// Amount, currency and installments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
    /// Customer contact data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    /// Recurring payment schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurring>,
    /// Planned (future dated) payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_date: Option<PlannedDate>,
    /// Pay-by-link delivery options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_by_link: Option<PayByLink>,
    /// Results of a completed 3-D Secure authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_transaction: Option<SecureTransaction>,
    /// Sub-merchant identity for payment facilitators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_merchant: Option<SubMerchant>,
    /// Business-to-business payment data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b2b: Option<B2b>,
    /// Social security institution (SGK) surcharge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sgk: Option<Sgk>,
    /// Ordered-field signature of the 3-D Secure form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl FormProjection for PaymentRequest {
    fn project(&self, form: &mut FormEncoding) {
        form.field("lang", Presence::Always, self.lang.as_deref())
            .field("okUrl", Presence::Always, self.ok_url.as_deref())
            .field("failUrl", Presence::Always, self.fail_url.as_deref())
            .field("txnCode", Presence::Always, self.txn_code.as_deref())
            .field("paymentModel", Presence::Always, self.payment_model.as_deref())
            .field("requestDateTime", Presence::Always, self.request_date_time.as_deref())
            .field("randomNumber", Presence::Always, self.random_number.as_deref())
            .nested(self.terminal.as_ref())
            .nested(self.card.as_ref())
            .nested(self.order.as_ref())
            .nested(self.reward.as_ref())
            .nested(self.transaction.as_ref())
            .nested(self.customer.as_ref())
            .nested(self.sub_merchant.as_ref())
            .nested(self.b2b.as_ref())
            .field("hash", Presence::Always, self.hash.as_deref());
    }
}

impl PaymentRequest {
    /// Creates a request for the given merchant and terminal, API version `1.00`.
    #[must_use]
    pub fn new(merchant_safe_id: impl Into<String>, terminal_safe_id: impl Into<String>) -> Self {
        Self {
            version: Some(super::API_VERSION.to_owned()),
            terminal: Some(Terminal {
                merchant_safe_id: Some(merchant_safe_id.into()),
                terminal_safe_id: Some(terminal_safe_id.into()),
            }),
            ..Self::default()
        }
    }

    /// Sets the language of the 3-D Secure pages.
    pub fn set_lang(&mut self, lang: impl Into<String>) -> &mut Self {
        self.lang = Some(lang.into());
        self
    }

    /// Sets the success return URL of the 3-D Secure flow.
    pub fn set_ok_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.ok_url = Some(url.into());
        self
    }

    /// Sets the failure return URL of the 3-D Secure flow.
    pub fn set_fail_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.fail_url = Some(url.into());
        self
    }

    /// Sets the card number.
    pub fn set_card_number(&mut self, number: impl Into<String>) -> &mut Self {
        self.card.get_or_insert_with(Card::default).card_number = Some(number.into());
        self
    }

    /// Sets the card holder name.
    pub fn set_card_holder_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.card.get_or_insert_with(Card::default).card_holder_name = Some(name.into());
        self
    }

    /// Sets the card expiry as the gateway's `MMYY` string.
    ///
    /// ```
    /// use akbank_pos::model::PaymentRequest;
    ///
    /// let mut request = PaymentRequest::default();
    /// request.set_card_expiry("09", "27");
    /// assert_eq!(request.card.unwrap().expire_date.as_deref(), Some("0927"));
    /// ```
    pub fn set_card_expiry(&mut self, month: &str, year: &str) -> &mut Self {
        self.card.get_or_insert_with(Card::default).expire_date = Some(format!("{month}{year}"));
        self
    }

    /// Sets the card security code.
    pub fn set_card_code(&mut self, cvv: impl Into<String>) -> &mut Self {
        self.card.get_or_insert_with(Card::default).cvv = Some(cvv.into());
        self
    }

    /// Sets amount and currency from their textual forms.
    ///
    /// An unknown currency code is sent as `0` and left for the gateway to
    /// reject.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::InvalidInput`] if `price` is not a decimal number.
    pub fn set_amount(&mut self, price: &str, currency: &str) -> Result<&mut Self> {
        let amount: Amount = price.parse()?;
        let transaction = self.transaction.get_or_insert_with(Transaction::default);
        transaction.amount = Some(amount);
        transaction.currency_code = Some(currency_code(currency));
        Ok(self)
    }

    /// Sets amount and currency from typed values.
    pub fn set_amount_in(&mut self, amount: Amount, currency: Currency) -> &mut Self {
        let transaction = self.transaction.get_or_insert_with(Transaction::default);
        transaction.amount = Some(amount);
        transaction.currency_code = Some(currency.code());
        self
    }

    /// Sets the installment count.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::InvalidInput`] if `installment` is not a non-negative integer.
    pub fn set_installment(&mut self, installment: &str) -> Result<&mut Self> {
        let count = installment.trim().parse::<u32>().map_err(|e| {
            PosError::InvalidInput(format!("installment '{installment}' is not a count: {e}"))
        })?;
        self.transaction.get_or_insert_with(Transaction::default).install_count = Some(count);
        Ok(self)
    }

    /// Sets the customer IPv4 address.
    pub fn set_customer_ipv4(&mut self, ip_address: impl Into<String>) -> &mut Self {
        self.customer.get_or_insert_with(Customer::default).ip_address = Some(ip_address.into());
        self
    }

    /// Sets the customer e-mail address.
    pub fn set_customer_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.customer.get_or_insert_with(Customer::default).email_address = Some(email.into());
        self
    }

    /// Sets the merchant order id.
    pub fn set_order_id(&mut self, order_id: impl Into<String>) -> &mut Self {
        self.order.get_or_insert_with(Order::default).order_id = Some(order_id.into());
        self
    }

    /// Sets the merchant order tracking id.
    pub fn set_order_track_id(&mut self, track_id: impl Into<String>) -> &mut Self {
        self.order.get_or_insert_with(Order::default).order_track_id = Some(track_id.into());
        self
    }

    /// Sets the sub-merchant id.
    pub fn set_sub_merchant_id(&mut self, id: impl Into<String>) -> &mut Self {
        let sub_merchant = self.sub_merchant.get_or_insert_with(SubMerchant::default);
        sub_merchant.sub_merchant_id = Some(id.into());
        self
    }

    /// Sets the B2B identity number.
    pub fn set_b2b_identity_number(&mut self, identity_number: impl Into<String>) -> &mut Self {
        self.b2b.get_or_insert_with(B2b::default).identity_number = Some(identity_number.into());
        self
    }

    /// Attaches the result of a completed 3-D Secure authentication.
    pub fn set_secure_transaction(
        &mut self,
        secure_id: impl Into<String>,
        secure_ecom_ind: impl Into<String>,
        secure_data: impl Into<String>,
        secure_md: impl Into<String>,
    ) -> &mut Self {
        self.secure_transaction = Some(SecureTransaction {
            secure_id: Some(secure_id.into()),
            secure_ecom_ind: Some(secure_ecom_ind.into()),
            secure_data: Some(secure_data.into()),
            secure_md: Some(secure_md.into()),
        });
        self
    }
}

/// Merchant and terminal identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terminal {
    /// Merchant safe id issued by the bank.
    #[serde(default, serialize_with = "always::string")]
    pub merchant_safe_id: Option<String>,
    /// Terminal safe id issued by the bank.
    #[serde(default, serialize_with = "always::string")]
    pub terminal_safe_id: Option<String>,
}

impl FormProjection for Terminal {
    fn project(&self, form: &mut FormEncoding) {
        form.field("merchantSafeId", Presence::Always, self.merchant_safe_id.as_deref())
            .field("terminalSafeId", Presence::Always, self.terminal_safe_id.as_deref());
    }
}

/// Card data.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Card holder name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_holder_name: Option<String>,
    /// Card number (PAN). Masked in responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    /// Card security code.
    #[serde(default, rename = "cvv2", skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    /// Expiry as `MMYY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_date: Option<String>,
}

impl std::fmt::Debug for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Card")
            .field("card_holder_name", &self.card_holder_name)
            .field("card_number", &self.card_number.as_ref().map(|_| "[REDACTED]"))
            .field("cvv", &self.cvv.as_ref().map(|_| "[REDACTED]"))
            .field("expire_date", &self.expire_date.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl FormProjection for Card {
    fn project(&self, form: &mut FormEncoding) {
        form.field("creditCard", Presence::OmitIfEmpty, self.card_number.as_deref())
            .field("cvv", Presence::OmitIfEmpty, self.cvv.as_deref())
            .field("expiredDate", Presence::OmitIfEmpty, self.expire_date.as_deref());
    }
}

/// Customer contact data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// E-mail address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    /// IPv4 address of the card holder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl FormProjection for Customer {
    fn project(&self, form: &mut FormEncoding) {
        form.field("emailAddress", Presence::OmitIfEmpty, self.email_address.as_deref());
    }
}

/// Insurance PAN data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePan {
    /// Card BIN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_number: Option<String>,
    /// Last four digits of the card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_last_four_param: Option<String>,
    /// Identity number of the insured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_number: Option<String>,
}

/// Order identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Merchant order id, unique per terminal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Free-form tracking id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_track_id: Option<String>,
}

impl FormProjection for Order {
    fn project(&self, form: &mut FormEncoding) {
        form.field("orderId", Presence::Always, self.order_id.as_deref());
    }
}

/// Pay-by-link delivery options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayByLink {
    /// Transaction code the link will run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_txn_code: Option<String>,
    /// Delivery channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_transfer_type: Option<String>,
    /// Mobile phone number for SMS delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone_number: Option<String>,
    /// E-mail address for e-mail delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Planned (future dated) payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedDate {
    /// Date of the first planned charge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_planned_date: Option<String>,
}

/// Recurring payment schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurring {
    /// Total number of payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_payments: Option<u32>,
    /// Interval between payments, in `frequency_cycle` units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_interval: Option<u32>,
    /// Unit of the interval (`D`, `W`, `M`, `Y`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_cycle: Option<String>,
    /// Sequence number of this payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_order: Option<u32>,
}

/// Results of a completed 3-D Secure authentication, for the direct API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureTransaction {
    /// 3-D Secure transaction id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_id: Option<String>,
    /// Electronic commerce indicator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_ecom_ind: Option<String>,
    /// Authentication value (CAVV/AAV).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_data: Option<String>,
    /// Merchant data returned by the access control server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_md: Option<String>,
}

/// Social security institution (SGK) surcharge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sgk {
    /// Surcharge amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surcharge_amount: Option<Amount>,
}

/// Sub-merchant identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMerchant {
    /// Sub-merchant id registered with the bank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_merchant_id: Option<String>,
}

impl FormProjection for SubMerchant {
    fn project(&self, form: &mut FormEncoding) {
        form.field("subMerchantId", Presence::OmitIfEmpty, self.sub_merchant_id.as_deref());
    }
}

/// Business-to-business payment data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B2b {
    /// Tax or identity number of the paying company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_number: Option<String>,
}

impl FormProjection for B2b {
    fn project(&self, form: &mut FormEncoding) {
        form.field("b2bIdentityNumber", Presence::OmitIfEmpty, self.identity_number.as_deref());
    }
}

/// Reward point usage and balances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    /// Chip-money reward to spend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccb_reward_amount: Option<Amount>,
    /// Partner reward to spend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcb_reward_amount: Option<Amount>,
    /// Extra reward to spend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xcb_reward_amount: Option<Amount>,
    /// Chip-money earned by this transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccb_earned_reward_amount: Option<Amount>,
    /// Remaining chip-money balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccb_balance_reward_amount: Option<Amount>,
    /// Chip-money description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccb_reward_desc: Option<String>,
    /// Partner reward earned by this transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcb_earned_reward_amount: Option<Amount>,
    /// Remaining partner reward balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcb_balance_reward_amount: Option<Amount>,
    /// Partner reward description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcb_reward_desc: Option<String>,
    /// Extra reward earned by this transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xcb_earned_reward_amount: Option<Amount>,
    /// Remaining extra reward balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xcb_balance_reward_amount: Option<Amount>,
    /// Extra reward description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xcb_reward_desc: Option<String>,
}

impl FormProjection for Reward {
    fn project(&self, form: &mut FormEncoding) {
        form.field("ccbRewardAmount", Presence::OmitIfEmpty, self.ccb_reward_amount)
            .field("pcbRewardAmount", Presence::OmitIfEmpty, self.pcb_reward_amount)
            .field("xcbRewardAmount", Presence::OmitIfEmpty, self.xcb_reward_amount);
    }
}

/// Amount, currency and installments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    /// Numeric currency identifier, see [`Currency`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<u16>,
    /// Mail/telephone order indicator, `0` for e-commerce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moto_ind: Option<u8>,
    /// Installment count.
    #[serde(default, rename = "installCount", skip_serializing_if = "Option::is_none")]
    pub install_count: Option<u32>,
    /// Authorization code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_code: Option<String>,
    /// Retrieval reference number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrn: Option<String>,
    /// Batch number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<u32>,
    /// System trace audit number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stan: Option<u32>,
}

impl FormProjection for Transaction {
    fn project(&self, form: &mut FormEncoding) {
        form.field("amount", Presence::Always, self.amount)
            .field("currencyCode", Presence::Always, self.currency_code)
            .field("installCount", Presence::OmitIfEmpty, self.install_count);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn request() -> PaymentRequest {
        PaymentRequest::new("M1", "T1")
    }

    #[test]
    fn test_new_sets_version_and_terminal() {
        let request = request();
        assert_eq!(request.version.as_deref(), Some("1.00"));
        let terminal = request.terminal.unwrap();
        assert_eq!(terminal.merchant_safe_id.as_deref(), Some("M1"));
        assert_eq!(terminal.terminal_safe_id.as_deref(), Some("T1"));
    }

    #[test]
    fn test_unset_fields_are_absent_from_json() {
        let json: Value = serde_json::to_value(request()).unwrap();
        let object = json.as_object().unwrap();

        for absent in ["lang", "okUrl", "card", "order", "transaction", "hash", "paymentModel"] {
            assert!(!object.contains_key(absent), "{absent} must be omitted");
        }
        assert!(!json.to_string().contains("null"));
    }

    #[test]
    fn test_always_fields_are_present_in_json_when_unset() {
        let json: Value = serde_json::to_value(PaymentRequest::default()).unwrap();
        assert_eq!(json["version"], "");
        assert_eq!(json["txnCode"], "");
        assert_eq!(json["requestDateTime"], "");
        assert_eq!(json["randomNumber"], "");

        let terminal = serde_json::to_value(Terminal::default()).unwrap();
        assert_eq!(terminal["merchantSafeId"], "");
        assert_eq!(terminal["terminalSafeId"], "");
    }

    #[test]
    fn test_amount_serializes_with_two_decimals() {
        let mut request = request();
        request.set_amount("10.5", "USD").unwrap();

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""amount":"10.50""#));
        assert!(json.contains(r#""currencyCode":840"#));
    }

    #[test]
    fn test_json_wire_names() {
        let mut request = request();
        request
            .set_card_number("4355084355084358")
            .set_card_code("000")
            .set_card_expiry("12", "30")
            .set_installment("3")
            .unwrap();

        let json: Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["card"]["cardNumber"], "4355084355084358");
        assert_eq!(json["card"]["cvv2"], "000");
        assert_eq!(json["card"]["expireDate"], "1230");
        assert_eq!(json["transaction"]["installCount"], 3);
    }

    #[test]
    fn test_set_amount_rejects_garbage() {
        let mut request = request();
        assert!(matches!(request.set_amount("abc", "USD"), Err(PosError::InvalidInput(_))));
        assert!(request.transaction.is_none());
    }

    #[test]
    fn test_set_amount_unknown_currency_is_zero() {
        let mut request = request();
        request.set_amount("5", "ABC").unwrap();
        assert_eq!(request.transaction.unwrap().currency_code, Some(0));
    }

    #[test]
    fn test_set_installment_rejects_garbage() {
        let mut request = request();
        assert!(request.set_installment("three").is_err());
        assert!(request.set_installment("-1").is_err());
    }

    #[test]
    fn test_form_projection_order() {
        let mut request = request();
        request
            .set_lang("TR")
            .set_ok_url("https://shop.example/ok")
            .set_fail_url("https://shop.example/fail")
            .set_card_number("4355084355084358")
            .set_card_code("000")
            .set_card_expiry("12", "30")
            .set_order_id("ORDER-1")
            .set_customer_email("buyer@example.com")
            .set_sub_merchant_id("SUB-1")
            .set_b2b_identity_number("1234567890");
        request.set_amount("10", "TRY").unwrap();
        request.set_installment("2").unwrap();
        request.reward =
            Some(Reward { ccb_reward_amount: Some(Amount::from(1_u32)), ..Reward::default() });

        let form = FormEncoding::project(&request);
        let names: Vec<&str> = form.names().collect();
        assert_eq!(
            names,
            vec![
                "lang",
                "okUrl",
                "failUrl",
                "txnCode",
                "paymentModel",
                "requestDateTime",
                "randomNumber",
                "merchantSafeId",
                "terminalSafeId",
                "creditCard",
                "cvv",
                "expiredDate",
                "orderId",
                "ccbRewardAmount",
                "amount",
                "currencyCode",
                "installCount",
                "emailAddress",
                "subMerchantId",
                "b2bIdentityNumber",
                "hash",
            ]
        );
        assert_eq!(form.get("amount"), Some("10.00"));
        assert_eq!(form.get("ccbRewardAmount"), Some("1.00"));
        assert_eq!(form.get("currencyCode"), Some("949"));
        assert_eq!(form.get("expiredDate"), Some("1230"));
    }

    #[test]
    fn test_form_excludes_json_only_fields() {
        let mut request = request();
        request
            .set_customer_ipv4("10.0.0.1")
            .set_card_holder_name("Jane Doe")
            .set_order_track_id("TRK");
        request.hash_items = Some("items".to_owned());

        let form = FormEncoding::project(&request);
        assert!(!form.iter().any(|(_, v)| v == "10.0.0.1" || v == "Jane Doe" || v == "TRK"));
        assert!(!form.contains("version"));
        assert!(!form.contains("hashItems"));
    }

    #[test]
    fn test_form_always_fields_present_when_unset() {
        let form = FormEncoding::project(&PaymentRequest::default());
        let always =
            ["lang", "txnCode", "merchantSafeId", "orderId", "amount", "currencyCode", "hash"];
        for name in always {
            assert_eq!(form.get(name), Some(""), "{name} must be present and empty");
        }
        for name in ["creditCard", "cvv", "installCount", "emailAddress", "b2bIdentityNumber"] {
            assert!(!form.contains(name), "{name} must be omitted");
        }
    }

    #[test]
    fn test_card_debug_is_redacted() {
        let mut request = request();
        request.set_card_number("4355084355084358").set_card_code("123");
        let debug = format!("{request:?}");
        assert!(!debug.contains("4355084355084358"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_request_json_round_trip_keeps_presence() {
        let mut request = request();
        request.set_order_id("ORDER-9");
        request.set_amount("1.1", "EUR").unwrap();

        let json = serde_json::to_string(&request).unwrap();
        let decoded: PaymentRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.order, request.order);
        assert_eq!(decoded.transaction, request.transaction);
        assert!(decoded.card.is_none());
    }
}
