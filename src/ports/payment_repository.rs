//! Payment repository port (write side).
//!
//! Defines the contract for persisting payments attached to orders.
//!
//! # Design
//!
//! - **Store-assigned ids**: `create` returns the payment with its new id,
//!   which then goes into the provider order reference
//! - **Scoped lookup**: a payment is only found through its owning order
//! - **No locking**: concurrent callbacks for the same payment rely on the
//!   store's per-row update semantics

use crate::domain::foundation::{DomainError, OrderId, PaymentId};
use crate::domain::payment::{NewPayment, Payment};
use async_trait::async_trait;

/// Repository port for Payment persistence.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Store a new payment and return it with its assigned id.
    async fn create(&self, payment: NewPayment) -> Result<Payment, DomainError>;

    /// Overwrite an existing payment.
    ///
    /// # Errors
    ///
    /// - `PaymentNotFound` if the payment doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Find a payment by id within the given order.
    ///
    /// Returns `None` if the payment doesn't exist or belongs to another order.
    async fn find_in_order(
        &self,
        order_id: OrderId,
        payment_id: PaymentId,
    ) -> Result<Option<Payment>, DomainError>;
}
