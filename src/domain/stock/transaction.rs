//! Stock ledger entries produced by payment processing.
//!
//! The ledger is append-only. Reserving stock for a pending payment, releasing
//! that reservation when the provider answers, and booking the sale are all
//! separate entries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{OrderId, PaymentId, StockTransactionId, Timestamp};
use crate::domain::order::Order;
use crate::domain::payment::PAYMENT_MODULE;

/// Ledger entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockTransactionKind {
    /// Stock held while the customer is on the hosted page.
    PaymentProcessReservation,
    /// Stock leaving the warehouse for an authorized payment.
    Sale,
}

impl StockTransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockTransactionKind::PaymentProcessReservation => "payment_process_reservation",
            StockTransactionKind::Sale => "sale",
        }
    }
}

impl fmt::Display for StockTransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an entry was written; decides kind, sign and notes label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockMovement {
    /// Hold stock before redirecting to the provider.
    Reserve,
    /// Give the hold back once the provider has answered.
    Release,
    /// Take stock out for good after authorization.
    Sell,
}

impl StockMovement {
    pub fn kind(&self) -> StockTransactionKind {
        match self {
            StockMovement::Reserve | StockMovement::Release => {
                StockTransactionKind::PaymentProcessReservation
            }
            StockMovement::Sell => StockTransactionKind::Sale,
        }
    }

    /// Whether item quantities are booked as negative changes.
    pub fn is_negative(&self) -> bool {
        !matches!(self, StockMovement::Release)
    }

    fn label(&self) -> &'static str {
        match self {
            StockMovement::Reserve => "payment process reservation",
            StockMovement::Release => "payment process reservation release",
            StockMovement::Sell => "sale",
        }
    }
}

/// Stock change for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLine {
    pub product_id: i64,
    pub change: i32,
}

/// Entry waiting to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStockTransaction {
    pub order_id: OrderId,
    pub payment_id: PaymentId,
    pub kind: StockTransactionKind,
    pub notes: String,
    pub lines: Vec<StockLine>,
}

impl NewStockTransaction {
    /// One entry covering every item of `order`.
    pub fn for_order(order: &Order, payment_id: PaymentId, movement: StockMovement) -> Self {
        let sign = if movement.is_negative() { -1 } else { 1 };
        let lines = order
            .items
            .iter()
            .map(|item| StockLine {
                product_id: item.product_id,
                change: sign * item.quantity,
            })
            .collect();

        Self {
            order_id: order.id,
            payment_id,
            kind: movement.kind(),
            notes: format!(
                "{} transaction. {} processed by {}",
                movement.label(),
                order,
                PAYMENT_MODULE
            ),
            lines,
        }
    }

    pub fn into_transaction(self, id: StockTransactionId, now: Timestamp) -> StockTransaction {
        StockTransaction {
            id,
            order_id: self.order_id,
            payment_id: self.payment_id,
            kind: self.kind,
            notes: self.notes,
            lines: self.lines,
            created_at: now,
        }
    }
}

/// Stored ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: StockTransactionId,
    pub order_id: OrderId,
    pub payment_id: PaymentId,
    pub kind: StockTransactionKind,
    pub notes: String,
    pub lines: Vec<StockLine>,
    pub created_at: Timestamp,
}

impl StockTransaction {
    /// Net change across all lines.
    pub fn net_change(&self) -> i64 {
        self.lines.iter().map(|line| i64::from(line.change)).sum()
    }
}
