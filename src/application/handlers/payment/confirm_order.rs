//! ConfirmOrderHandler - Starts a hosted-page payment for an order.

use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::config::PostfinanceConfig;
use crate::domain::foundation::OrderId;
use crate::domain::payment::{CheckoutError, NewPayment, OrderReference, PaymentRequest};
use crate::domain::stock::{NewStockTransaction, StockMovement};
use crate::ports::{OrderRepository, PaymentRepository, StockLedger};

/// Command to confirm an order for payment.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmOrderCommand {
    pub order_id: OrderId,
}

/// Result of confirming an order.
#[derive(Debug, Clone)]
pub enum ConfirmOrderResult {
    /// Nothing left to pay; send the customer to the given URL.
    AlreadyPaid { redirect_to: String },
    /// Signed request for the provider's hosted page.
    PaymentRequested(PaymentRequest),
}

/// Handler that opens a payment for the remaining balance of an order.
///
/// Creates the payment, reserves stock for the order's items, then builds
/// the signed form parameters the customer's browser posts to the provider.
pub struct ConfirmOrderHandler {
    orders: Arc<dyn OrderRepository>,
    payments: Arc<dyn PaymentRepository>,
    stock: Arc<dyn StockLedger>,
    config: PostfinanceConfig,
}

impl ConfirmOrderHandler {
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

    pub async fn handle(
        &self,
        cmd: ConfirmOrderCommand,
    ) -> Result<ConfirmOrderResult, CheckoutError> {
        let order = self
            .orders
            .find_by_id(cmd.order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound(cmd.order_id))?;

        if order.is_paid() {
            tracing::info!(order_id = %order.id, "order already paid, skipping checkout");
            return Ok(ConfirmOrderResult::AlreadyPaid {
                redirect_to: self.config.already_paid_url.clone(),
            });
        }

        let payment = self.payments.create(NewPayment::for_balance(&order)).await?;

        self.stock
            .record(NewStockTransaction::for_order(
                &order,
                payment.id,
                StockMovement::Reserve,
            ))
            .await?;

        let mut request = PaymentRequest::signed(
            OrderReference::new(order.id, payment.id),
            &payment.amount,
            &payment.currency,
            &self.config.pspid,
            self.config.mode(),
            self.config.hash_algorithm,
            self.config.sha1_in.expose_secret(),
        );
        for (name, value) in self.config.optional_form_fields() {
            request = request.with_extra_field(name, value);
        }

        tracing::info!(
            order_id = %order.id,
            payment_id = %payment.id,
            amount = %request.amount,
            currency = %request.currency,
            mode = request.mode.as_str(),
            "payment request built"
        );

        Ok(ConfirmOrderResult::PaymentRequested(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryShopStore;
    use crate::domain::foundation::PaymentId;
    use crate::domain::order::{Order, OrderItem};
    use crate::domain::payment::{GatewayMode, ShaAlgorithm};
    use crate::domain::stock::StockTransactionKind;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn order(id: i64, total: &str, paid: &str) -> Order {
        let mut order = Order::new(
            OrderId::new(id),
            "CHF",
            dec(total),
            vec![
                OrderItem {
                    product_id: 10,
                    quantity: 2,
                },
                OrderItem {
                    product_id: 11,
                    quantity: 1,
                },
            ],
        );
        order.paid = dec(paid);
        order
    }

    fn handler_with(store: Arc<InMemoryShopStore>, config: PostfinanceConfig) -> ConfirmOrderHandler {
        ConfirmOrderHandler::new(store.clone(), store.clone(), store, config)
    }

    fn handler(store: Arc<InMemoryShopStore>) -> ConfirmOrderHandler {
        handler_with(store, PostfinanceConfig::new("myshop", "in-secret", "out-secret"))
    }

    fn expect_request(result: ConfirmOrderResult) -> PaymentRequest {
        match result {
            ConfirmOrderResult::PaymentRequested(request) => request,
            other => panic!("expected a payment request, got {:?}", other),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn builds_signed_request_for_remaining_balance() {
        let store = Arc::new(InMemoryShopStore::new());
        store.insert_order(order(7, "42.50", "10.00"));

        let result = handler(store.clone())
            .handle(ConfirmOrderCommand {
                order_id: OrderId::new(7),
            })
            .await
            .unwrap();
        let request = expect_request(result);

        assert_eq!(request.order_reference, "Order-7-1");
        assert_eq!(request.amount, "3250");
        assert_eq!(request.currency, "CHF");
        assert_eq!(request.pspid, "myshop");
        assert_eq!(request.mode, GatewayMode::Test);
        assert_eq!(
            request.signature,
            ShaAlgorithm::Sha1.sign(&["Order-7-1", "3250", "CHF", "myshop"], "in-secret")
        );
    }

    #[tokio::test]
    async fn creates_payment_and_reserves_stock() {
        let store = Arc::new(InMemoryShopStore::new());
        store.insert_order(order(7, "42.50", "0"));

        handler(store.clone())
            .handle(ConfirmOrderCommand {
                order_id: OrderId::new(7),
            })
            .await
            .unwrap();

        let payments = store.payments_for_order(OrderId::new(7));
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, dec("42.50"));
        assert!(!payments[0].is_authorized());

        let entries = store.stock_transactions();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, StockTransactionKind::PaymentProcessReservation);
        assert_eq!(entries[0].payment_id, PaymentId::new(1));
        assert_eq!(entries[0].net_change(), -3);
        assert_eq!(
            entries[0].notes,
            "payment process reservation transaction. Order #7 processed by Postfinance"
        );
    }

    #[tokio::test]
    async fn paid_order_redirects_without_side_effects() {
        let store = Arc::new(InMemoryShopStore::new());
        store.insert_order(order(7, "42.50", "42.50"));

        let result = handler(store.clone())
            .handle(ConfirmOrderCommand {
                order_id: OrderId::new(7),
            })
            .await
            .unwrap();

        match result {
            ConfirmOrderResult::AlreadyPaid { redirect_to } => {
                assert_eq!(redirect_to, "/order/already-paid/")
            }
            other => panic!("expected redirect, got {:?}", other),
        }
        assert_eq!(store.payment_count(), 0);
        assert!(store.stock_transactions().is_empty());
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let store = Arc::new(InMemoryShopStore::new());

        let err = handler(store)
            .handle(ConfirmOrderCommand {
                order_id: OrderId::new(404),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::OrderNotFound(id) if id == OrderId::new(404)));
    }

    #[tokio::test]
    async fn live_config_and_return_urls_reach_the_request() {
        let store = Arc::new(InMemoryShopStore::new());
        store.insert_order(order(3, "12.3456", "0"));
        let config = PostfinanceConfig {
            live: true,
            accept_url: Some("https://shop.example/thanks".to_string()),
            ..PostfinanceConfig::new("myshop", "in-secret", "out-secret")
        };

        let request = expect_request(
            handler_with(store, config)
                .handle(ConfirmOrderCommand {
                    order_id: OrderId::new(3),
                })
                .await
                .unwrap(),
        );

        assert_eq!(request.amount, "1235");
        assert_eq!(request.mode, GatewayMode::Prod);
        assert!(request
            .form_fields()
            .contains(&("ACCEPTURL", "https://shop.example/thanks")));
        assert_eq!(
            request.signature,
            ShaAlgorithm::Sha1.sign(&["Order-3-1", "1235", "CHF", "myshop"], "in-secret")
        );
    }
}
