//! Parsed IPN callback from the provider.

use bigdecimal::BigDecimal;
use serde_json::{Map, Value};

use crate::domain::foundation::parse_amount;

use super::errors::IpnError;
use super::order_reference::OrderReference;
use super::signature::{signatures_match, ShaAlgorithm};
use super::status::StatusCode;

/// Form field names of the callback, as posted by the provider.
pub mod fields {
    pub const ORDER_ID: &str = "orderID";
    pub const CURRENCY: &str = "currency";
    pub const AMOUNT: &str = "amount";
    pub const PAYMENT_METHOD: &str = "PM";
    pub const ACCEPTANCE: &str = "ACCEPTANCE";
    pub const STATUS: &str = "STATUS";
    pub const CARD_NUMBER: &str = "CARDNO";
    pub const PAY_ID: &str = "PAYID";
    pub const NC_ERROR: &str = "NCERROR";
    pub const BRAND: &str = "BRAND";
    pub const SIGNATURE: &str = "SHASIGN";
}

/// IPN callback with every required field present.
///
/// Values are kept exactly as received; the signature is computed over the
/// raw strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpnNotification {
    pub order_id: String,
    pub currency: String,
    pub amount: String,
    pub payment_method: String,
    pub acceptance: String,
    pub status: StatusCode,
    pub card_number: String,
    pub pay_id: String,
    pub nc_error: String,
    pub brand: String,
    pub signature: String,
    raw: Vec<(String, String)>,
}

impl IpnNotification {
    /// Builds a notification from decoded form pairs.
    ///
    /// When a key repeats, the last value wins.
    ///
    /// # Errors
    ///
    /// `IpnError::MissingData` naming the first absent field.
    pub fn from_fields(raw: Vec<(String, String)>) -> Result<Self, IpnError> {
        let get = |name: &'static str| -> Result<String, IpnError> {
            raw.iter()
                .rev()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
                .ok_or(IpnError::MissingData(name))
        };

        Ok(Self {
            order_id: get(fields::ORDER_ID)?,
            currency: get(fields::CURRENCY)?,
            amount: get(fields::AMOUNT)?,
            payment_method: get(fields::PAYMENT_METHOD)?,
            acceptance: get(fields::ACCEPTANCE)?,
            status: StatusCode::new(get(fields::STATUS)?),
            card_number: get(fields::CARD_NUMBER)?,
            pay_id: get(fields::PAY_ID)?,
            nc_error: get(fields::NC_ERROR)?,
            brand: get(fields::BRAND)?,
            signature: get(fields::SIGNATURE)?,
            raw,
        })
    }

    /// Signature input fields, in protocol order.
    fn signed_fields(&self) -> [&str; 10] {
        [
            self.order_id.as_str(),
            self.currency.as_str(),
            self.amount.as_str(),
            self.payment_method.as_str(),
            self.acceptance.as_str(),
            self.status.as_str(),
            self.card_number.as_str(),
            self.pay_id.as_str(),
            self.nc_error.as_str(),
            self.brand.as_str(),
        ]
    }

    /// Digest the provider should have sent for this callback.
    pub fn expected_signature(&self, algorithm: ShaAlgorithm, secret: &str) -> String {
        algorithm.sign(&self.signed_fields(), secret)
    }

    /// Checks `SHASIGN` against the recomputed digest.
    pub fn verify(&self, algorithm: ShaAlgorithm, secret: &str) -> Result<(), IpnError> {
        let expected = self.expected_signature(algorithm, secret);
        if signatures_match(&expected, &self.signature) {
            Ok(())
        } else {
            Err(IpnError::HashMismatch)
        }
    }

    /// Decodes `orderID` into the order and payment keys.
    pub fn order_reference(&self) -> Result<OrderReference, IpnError> {
        self.order_id.parse()
    }

    /// Parses the callback amount (major units).
    pub fn parsed_amount(&self) -> Result<BigDecimal, IpnError> {
        parse_amount(&self.amount).map_err(|e| IpnError::InvalidAmount(e.to_string()))
    }

    /// Whole callback as a JSON object, for the audit copy on the payment.
    ///
    /// Repeated keys become arrays, single keys plain strings.
    pub fn raw_payload(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.raw {
            match map.get_mut(key) {
                None => {
                    map.insert(key.clone(), Value::String(value.clone()));
                }
                Some(Value::Array(values)) => values.push(Value::String(value.clone())),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value.clone())]);
                }
            }
        }
        Value::Object(map)
    }
}

/// Builds a correctly signed SHA-1 callback body.
#[cfg(test)]
pub fn signed_test_fields(
    order_id: &str,
    status: &str,
    amount: &str,
    secret: &str,
) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = vec![
        (fields::ORDER_ID.into(), order_id.into()),
        (fields::CURRENCY.into(), "CHF".into()),
        (fields::AMOUNT.into(), amount.into()),
        (fields::PAYMENT_METHOD.into(), "CreditCard".into()),
        (fields::ACCEPTANCE.into(), "test123".into()),
        (fields::STATUS.into(), status.into()),
        (fields::CARD_NUMBER.into(), "XXXXXXXXXXXX1111".into()),
        (fields::PAY_ID.into(), "3001234".into()),
        (fields::NC_ERROR.into(), "0".into()),
        (fields::BRAND.into(), "VISA".into()),
    ];
    let source: Vec<&str> = pairs.iter().map(|(_, v)| v.as_str()).collect();
    let signature = ShaAlgorithm::Sha1.sign(&source, secret);
    pairs.push((fields::SIGNATURE.into(), signature));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{OrderId, PaymentId};
    use std::str::FromStr;

    const SECRET: &str = "out-secret";

    fn notification(status: &str) -> IpnNotification {
        IpnNotification::from_fields(signed_test_fields("Order-4-2", status, "12.35", SECRET))
            .unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // Extraction Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn extracts_all_required_fields() {
        let n = notification("5");
        assert_eq!(n.order_id, "Order-4-2");
        assert_eq!(n.currency, "CHF");
        assert_eq!(n.amount, "12.35");
        assert_eq!(n.payment_method, "CreditCard");
        assert_eq!(n.status.as_str(), "5");
        assert_eq!(n.pay_id, "3001234");
        assert_eq!(n.brand, "VISA");
    }

    #[test]
    fn missing_card_number_is_reported() {
        let fields: Vec<(String, String)> =
            signed_test_fields("Order-4-2", "5", "12.35", SECRET)
                .into_iter()
                .filter(|(k, _)| k != fields::CARD_NUMBER)
                .collect();

        let result = IpnNotification::from_fields(fields);

        assert!(matches!(result, Err(IpnError::MissingData("CARDNO"))));
    }

    #[test]
    fn empty_body_reports_first_field() {
        let result = IpnNotification::from_fields(vec![]);
        assert!(matches!(result, Err(IpnError::MissingData("orderID"))));
    }

    #[test]
    fn field_names_are_case_sensitive() {
        let fields: Vec<(String, String)> =
            signed_test_fields("Order-4-2", "5", "12.35", SECRET)
                .into_iter()
                .map(|(k, v)| {
                    if k == fields::STATUS {
                        ("status".to_string(), v)
                    } else {
                        (k, v)
                    }
                })
                .collect();

        let result = IpnNotification::from_fields(fields);

        assert!(matches!(result, Err(IpnError::MissingData("STATUS"))));
    }

    #[test]
    fn repeated_key_uses_last_value() {
        let mut fields = signed_test_fields("Order-4-2", "5", "12.35", SECRET);
        fields.insert(0, (fields::STATUS.to_string(), "9".to_string()));

        let n = IpnNotification::from_fields(fields).unwrap();

        assert_eq!(n.status.as_str(), "5");
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn valid_signature_verifies() {
        assert!(notification("5").verify(ShaAlgorithm::Sha1, SECRET).is_ok());
    }

    #[test]
    fn uppercase_signature_verifies() {
        let mut n = notification("5");
        n.signature = n.signature.to_uppercase();
        assert!(n.verify(ShaAlgorithm::Sha1, SECRET).is_ok());
    }

    #[test]
    fn wrong_secret_fails() {
        let result = notification("5").verify(ShaAlgorithm::Sha1, "in-secret");
        assert!(matches!(result, Err(IpnError::HashMismatch)));
    }

    #[test]
    fn tampered_status_fails() {
        let mut n = notification("2");
        n.status = StatusCode::new("5");
        assert!(matches!(
            n.verify(ShaAlgorithm::Sha1, SECRET),
            Err(IpnError::HashMismatch)
        ));
    }

    #[test]
    fn expected_signature_follows_protocol_order() {
        let n = notification("9");
        let source = format!(
            "{}{}{}{}{}{}{}{}{}{}{}",
            "Order-4-2",
            "CHF",
            "12.35",
            "CreditCard",
            "test123",
            "9",
            "XXXXXXXXXXXX1111",
            "3001234",
            "0",
            "VISA",
            SECRET
        );
        assert_eq!(
            n.expected_signature(ShaAlgorithm::Sha1, SECRET),
            ShaAlgorithm::Sha1.digest_hex(source.as_bytes())
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Decoding Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn order_reference_decodes_ids() {
        let reference = notification("5").order_reference().unwrap();
        assert_eq!(reference.order_id, OrderId::new(4));
        assert_eq!(reference.payment_id, PaymentId::new(2));
    }

    #[test]
    fn parsed_amount_is_decimal() {
        assert_eq!(
            notification("5").parsed_amount().unwrap(),
            BigDecimal::from_str("12.35").unwrap()
        );
    }

    #[test]
    fn unparseable_amount_is_invalid() {
        let mut n = notification("5");
        n.amount = "12,35".to_string();
        assert!(matches!(n.parsed_amount(), Err(IpnError::InvalidAmount(_))));
    }

    #[test]
    fn raw_payload_keeps_every_field() {
        let payload = notification("5").raw_payload();
        assert_eq!(payload["orderID"], "Order-4-2");
        assert_eq!(payload["BRAND"], "VISA");
        assert!(payload.get("SHASIGN").is_some());
    }

    #[test]
    fn raw_payload_collects_repeated_keys() {
        let mut fields = signed_test_fields("Order-4-2", "5", "12.35", SECRET);
        fields.push(("extra".to_string(), "a".to_string()));
        fields.push(("extra".to_string(), "b".to_string()));
        fields.push(("extra".to_string(), "c".to_string()));

        let payload = IpnNotification::from_fields(fields).unwrap().raw_payload();

        assert_eq!(payload["extra"], serde_json::json!(["a", "b", "c"]));
    }
}
