//! Order reference carried through the provider round trip.
//!
//! The provider has a single free-form `orderID` field. The gateway packs
//! both the shop order id and the payment id into it as
//! `Order-<orderId>-<paymentId>` and unpacks it again from the callback.

use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{OrderId, PaymentId};

use super::errors::IpnError;

const PREFIX: &str = "Order";

/// Composite (order, payment) key encoded in the provider's `orderID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderReference {
    pub order_id: OrderId,
    pub payment_id: PaymentId,
}

impl OrderReference {
    pub fn new(order_id: OrderId, payment_id: PaymentId) -> Self {
        Self {
            order_id,
            payment_id,
        }
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", PREFIX, self.order_id, self.payment_id)
    }
}

impl FromStr for OrderReference {
    type Err = IpnError;

    /// Parses `<prefix>-<orderId>-<paymentId>`.
    ///
    /// Exactly three dash separated parts are required. The prefix text is
    /// not checked, only the two numeric ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        let [_prefix, order_id, payment_id] = parts.as_slice() else {
            return Err(IpnError::MalformedOrderId);
        };

        let order_id = order_id
            .parse::<OrderId>()
            .map_err(|_| IpnError::MalformedOrderId)?;
        let payment_id = payment_id
            .parse::<PaymentId>()
            .map_err(|_| IpnError::MalformedOrderId)?;

        Ok(Self::new(order_id, payment_id))
    }
}
