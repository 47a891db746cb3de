//! Order aggregate as seen by the payment gateway.
//!
//! The shop owns orders; the gateway only reads them to learn what is
//! outstanding and which stock lines a payment touches.

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{OrderId, Timestamp};

/// A single product line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product whose stock is affected.
    pub product_id: i64,

    /// Ordered quantity (always positive).
    pub quantity: i32,
}

/// Order aggregate.
///
/// # Invariants
///
/// - `total` and `paid` share the order's `currency`
/// - `balance_remaining() == total - paid`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,

    /// ISO 4217 currency code.
    pub currency: String,

    /// Order total including taxes and shipping.
    pub total: BigDecimal,

    /// Sum of payments already captured.
    pub paid: BigDecimal,

    pub items: Vec<OrderItem>,

    pub created_at: Timestamp,
}

impl Order {
    /// Creates an unpaid order.
    pub fn new(
        id: OrderId,
        currency: impl Into<String>,
        total: BigDecimal,
        items: Vec<OrderItem>,
    ) -> Self {
        Self {
            id,
            currency: currency.into(),
            total,
            paid: BigDecimal::zero(),
            items,
            created_at: Timestamp::now(),
        }
    }

    /// Amount still owed on this order.
    pub fn balance_remaining(&self) -> BigDecimal {
        &self.total - &self.paid
    }

    /// Whether nothing is left to pay.
    pub fn is_paid(&self) -> bool {
        self.balance_remaining() <= BigDecimal::zero()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order #{}", self.id)
    }
}
