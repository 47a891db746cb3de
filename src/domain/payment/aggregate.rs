//! Payment aggregate.
//!
//! A payment is one attempt to settle (part of) an order through the
//! provider. It is created when the customer is sent to the hosted page and
//! rewritten by every IPN callback for it.
//!
//! # Lifecycle
//!
//! ```text
//! created ──callback──> status note updated (repeatable)
//!    │
//!    └──callback STATUS=5──> authorized (timestamp set once, never reset)
//! ```

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrderId, PaymentId, Timestamp};
use crate::domain::order::Order;

use super::errors::IpnError;
use super::notification::IpnNotification;

/// Name recorded as `payment_module` on every payment this gateway creates.
pub const PAYMENT_MODULE: &str = "Postfinance";

/// Payment aggregate.
///
/// # Invariants
///
/// - `authorized` is set at most once and never cleared
/// - `order_id` never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,

    pub order_id: OrderId,

    pub currency: String,

    /// Amount in major units.
    pub amount: BigDecimal,

    /// Gateway that created the payment.
    pub payment_module: String,

    /// Card brand or payment method reported by the provider.
    pub payment_method: Option<String>,

    /// Provider transaction id (`PAYID`).
    pub transaction_id: Option<String>,

    /// Human readable provider status.
    pub notes: Option<String>,

    /// Last callback payload, verbatim.
    pub data: serde_json::Value,

    /// When the provider first reported the payment as authorized.
    pub authorized: Option<Timestamp>,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}

/// Values for a payment that has not been stored yet.
///
/// The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub order_id: OrderId,
    pub currency: String,
    pub amount: BigDecimal,
    pub payment_module: String,
}

impl NewPayment {
    /// Payment for everything still owed on `order`.
    pub fn for_balance(order: &Order) -> Self {
        Self {
            order_id: order.id,
            currency: order.currency.clone(),
            amount: order.balance_remaining(),
            payment_module: PAYMENT_MODULE.to_string(),
        }
    }

    /// Payment for a callback that names a payment the store does not know,
    /// carrying the currency and amount the provider reported.
    ///
    /// # Errors
    ///
    /// `IpnError::InvalidAmount` if the callback amount is not a decimal.
    pub fn for_callback(order: &Order, notification: &IpnNotification) -> Result<Self, IpnError> {
        Ok(Self {
            order_id: order.id,
            currency: notification.currency.clone(),
            amount: notification.parsed_amount()?,
            payment_module: PAYMENT_MODULE.to_string(),
        })
    }

    /// Materializes the payment under a store-assigned id.
    pub fn into_payment(self, id: PaymentId, now: Timestamp) -> Payment {
        Payment {
            id,
            order_id: self.order_id,
            currency: self.currency,
            amount: self.amount,
            payment_module: self.payment_module,
            payment_method: None,
            transaction_id: None,
            notes: None,
            data: serde_json::Value::Null,
            authorized: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Payment {
    /// Whether the provider has ever authorized this payment.
    pub fn is_authorized(&self) -> bool {
        self.authorized.is_some()
    }

    /// Overwrites the mutable fields from a verified callback.
    ///
    /// Returns `true` when the callback reports the authorized status. The
    /// authorization timestamp is only stamped the first time.
    ///
    /// # Errors
    ///
    /// `IpnError::InvalidAmount` if the callback amount is not a decimal;
    /// the payment is left untouched in that case.
    pub fn apply_notification(
        &mut self,
        notification: &IpnNotification,
        now: Timestamp,
    ) -> Result<bool, IpnError> {
        let amount = notification.parsed_amount()?;

        self.currency = notification.currency.clone();
        self.amount = amount;
        self.data = notification.raw_payload();
        self.transaction_id = Some(notification.pay_id.clone());
        self.payment_method = Some(notification.brand.clone());
        self.notes = notification.status.description().map(str::to_string);
        self.updated_at = now;

        let authorized_now = notification.status.is_authorized();
        if authorized_now && self.authorized.is_none() {
            self.authorized = Some(now);
        }

        Ok(authorized_now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderItem;
    use crate::domain::payment::notification::signed_test_fields;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn test_order() -> Order {
        Order::new(
            OrderId::new(4),
            "CHF",
            dec("30.00"),
            vec![OrderItem {
                product_id: 10,
                quantity: 1,
            }],
        )
    }

    fn test_payment() -> Payment {
        NewPayment::for_balance(&test_order()).into_payment(PaymentId::new(2), Timestamp::now())
    }

    fn callback(status: &str) -> IpnNotification {
        IpnNotification::from_fields(signed_test_fields("Order-4-2", status, "30.00", "s"))
            .unwrap()
    }

    #[test]
    fn new_payment_covers_remaining_balance() {
        let mut order = test_order();
        order.paid = dec("10");

        let new = NewPayment::for_balance(&order);

        assert_eq!(new.amount, dec("20.00"));
        assert_eq!(new.currency, "CHF");
        assert_eq!(new.payment_module, PAYMENT_MODULE);
    }

    #[test]
    fn callback_payment_takes_reported_amount() {
        let new = NewPayment::for_callback(&test_order(), &callback("5")).unwrap();

        assert_eq!(new.order_id, OrderId::new(4));
        assert_eq!(new.amount, dec("30.00"));
        assert_eq!(new.currency, "CHF");
    }

    #[test]
    fn callback_payment_rejects_bad_amount() {
        let mut bad = callback("5");
        bad.amount = "abc".to_string();

        let result = NewPayment::for_callback(&test_order(), &bad);

        assert!(matches!(result, Err(IpnError::InvalidAmount(_))));
    }

    #[test]
    fn materialized_payment_is_unauthorized() {
        let payment = test_payment();
        assert_eq!(payment.id, PaymentId::new(2));
        assert!(!payment.is_authorized());
        assert!(payment.transaction_id.is_none());
    }

    #[test]
    fn callback_overwrites_mutable_fields() {
        let mut payment = test_payment();

        let authorized = payment
            .apply_notification(&callback("9"), Timestamp::now())
            .unwrap();

        assert!(!authorized);
        assert_eq!(payment.transaction_id.as_deref(), Some("3001234"));
        assert_eq!(payment.payment_method.as_deref(), Some("VISA"));
        assert_eq!(payment.notes.as_deref(), Some("Payment requested"));
        assert_eq!(payment.data["STATUS"], "9");
        assert!(!payment.is_authorized());
    }

    #[test]
    fn authorized_callback_stamps_timestamp() {
        let mut payment = test_payment();
        let now = Timestamp::now();

        let authorized = payment.apply_notification(&callback("5"), now).unwrap();

        assert!(authorized);
        assert_eq!(payment.authorized, Some(now));
        assert_eq!(payment.notes.as_deref(), Some("Authorized"));
    }

    #[test]
    fn later_callbacks_keep_first_authorization() {
        let mut payment = test_payment();
        let first = Timestamp::now();
        payment.apply_notification(&callback("5"), first).unwrap();

        payment
            .apply_notification(&callback("9"), first.plus_secs(60))
            .unwrap();
        payment
            .apply_notification(&callback("5"), first.plus_secs(120))
            .unwrap();

        assert_eq!(payment.authorized, Some(first));
        assert_eq!(payment.notes.as_deref(), Some("Authorized"));
    }

    #[test]
    fn unknown_status_clears_notes() {
        let mut payment = test_payment();
        payment.apply_notification(&callback("5"), Timestamp::now()).unwrap();

        payment.apply_notification(&callback("3"), Timestamp::now()).unwrap();

        assert!(payment.notes.is_none());
        assert!(payment.is_authorized());
    }

    #[test]
    fn invalid_amount_leaves_payment_untouched() {
        let mut payment = test_payment();
        let before = payment.clone();
        let mut bad = callback("5");
        bad.amount = "n/a".to_string();

        let result = payment.apply_notification(&bad, Timestamp::now());

        assert!(matches!(result, Err(IpnError::InvalidAmount(_))));
        assert_eq!(payment, before);
    }
}
