//! HandleIpnHandler - Command handler for PostFinance IPN callbacks.

use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::config::PostfinanceConfig;
use crate::domain::foundation::{OrderId, PaymentId, Timestamp};
use crate::domain::payment::{IpnError, IpnNotification, NewPayment};
use crate::domain::stock::{NewStockTransaction, StockMovement};
use crate::ports::{OrderRepository, PaymentRepository, StockLedger};

/// Command to process one callback.
#[derive(Debug, Clone)]
pub struct HandleIpnCommand {
    /// Decoded form pairs, in the order received.
    pub fields: Vec<(String, String)>,
}

/// Result of a processed callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleIpnResult {
    pub order_id: OrderId,
    pub payment_id: PaymentId,
    /// The callback named a payment the store did not have.
    pub payment_created: bool,
    /// The callback carried the authorized status.
    pub authorized: bool,
}

/// Handler for provider callbacks.
///
/// Verifies the signature, updates the referenced payment, and moves stock:
/// the reservation is always released, and a sale is recorded when the
/// payment is authorized.
pub struct HandleIpnHandler {
    orders: Arc<dyn OrderRepository>,
    payments: Arc<dyn PaymentRepository>,
    stock: Arc<dyn StockLedger>,
    config: PostfinanceConfig,
}

impl HandleIpnHandler {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        payments: Arc<dyn PaymentRepository>,
        stock: Arc<dyn StockLedger>,
        config: PostfinanceConfig,
    ) -> Self {
        Self {
            orders,
            payments,
            stock,
            config,
        }
    }

    pub async fn handle(&self, cmd: HandleIpnCommand) -> Result<HandleIpnResult, IpnError> {
        // 1. Required fields and signature, before any store access
        let notification = IpnNotification::from_fields(cmd.fields)?;
        notification.verify(
            self.config.hash_algorithm,
            self.config.sha1_out.expose_secret(),
        )?;
        let reference = notification.order_reference()?;

        // 2. Resolve order and payment
        let order = self
            .orders
            .find_by_id(reference.order_id)
            .await?
            .ok_or(IpnError::OrderNotFound(reference.order_id))?;

        let (mut payment, payment_created) = match self
            .payments
            .find_in_order(order.id, reference.payment_id)
            .await?
        {
            Some(payment) => (payment, false),
            None => {
                tracing::warn!(
                    order_id = %order.id,
                    payment_id = %reference.payment_id,
                    "callback for unknown payment, creating one"
                );
                let new_payment = NewPayment::for_callback(&order, &notification)?;
                (self.payments.create(new_payment).await?, true)
            }
        };

        // 3. Apply the callback
        let authorized = payment.apply_notification(&notification, Timestamp::now())?;
        self.payments.update(&payment).await?;

        // 4. Stock movements
        self.stock
            .record(NewStockTransaction::for_order(
                &order,
                payment.id,
                StockMovement::Release,
            ))
            .await?;
        if authorized {
            self.stock
                .record(NewStockTransaction::for_order(
                    &order,
                    payment.id,
                    StockMovement::Sell,
                ))
                .await?;
        }

        tracing::info!(
            order_id = %order.id,
            payment_id = %payment.id,
            status = notification.status.as_str(),
            authorized,
            "postfinance callback processed"
        );

        Ok(HandleIpnResult {
            order_id: order.id,
            payment_id: payment.id,
            payment_created,
            authorized,
        })
    }
}
