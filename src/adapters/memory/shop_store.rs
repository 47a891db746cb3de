//! In-memory shop store.
//!
//! Implements every persistence port over process memory. Used when no
//! database is configured and as the backing store in tests.
//!
//! Orders belong to the shop, so a standalone gateway starts empty unless it
//! is seeded from a JSON file:
//!
//! ```json
//! [{"id": 7, "currency": "CHF", "total": "30.00", "items": [{"product_id": 1, "quantity": 2}]}]
//! ```

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::foundation::{
    DomainError, ErrorCode, OrderId, PaymentId, StockTransactionId, Timestamp,
};
use crate::domain::order::{Order, OrderItem};
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::stock::{NewStockTransaction, StockTransaction};
use crate::ports::{OrderRepository, PaymentRepository, StockLedger};

#[derive(Default)]
struct Tables {
    orders: BTreeMap<OrderId, Order>,
    payments: BTreeMap<PaymentId, Payment>,
    stock: Vec<StockTransaction>,
    next_payment_id: i64,
    next_stock_id: i64,
}

/// Orders, payments and the stock ledger behind one lock.
///
/// Ids are assigned sequentially starting at 1.
#[derive(Default)]
pub struct InMemoryShopStore {
    tables: RwLock<Tables>,
}

/// One order in a seed file. `paid` defaults to zero.
#[derive(Debug, Deserialize)]
struct SeedOrder {
    id: OrderId,
    currency: String,
    total: BigDecimal,
    paid: Option<BigDecimal>,
    items: Vec<OrderItem>,
}

impl From<SeedOrder> for Order {
    fn from(seed: SeedOrder) -> Self {
        let mut order = Order::new(seed.id, seed.currency, seed.total, seed.items);
        if let Some(paid) = seed.paid {
            order.paid = paid;
        }
        order
    }
}

fn poisoned<T>(_: PoisonError<T>) -> DomainError {
    DomainError::new(ErrorCode::InternalError, "shop store lock poisoned")
}

impl InMemoryShopStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an order. Orders are owned by the shop, so this is
    /// the only way they enter the store.
    pub fn insert_order(&self, order: Order) {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables.orders.insert(order.id, order);
    }

    /// Inserts every order of a JSON array and returns how many were read.
    ///
    /// Nothing is inserted if the document does not parse.
    pub fn seed_orders_json(&self, json: &str) -> Result<usize, serde_json::Error> {
        let seeds: Vec<SeedOrder> = serde_json::from_str(json)?;
        let count = seeds.len();
        for seed in seeds {
            self.insert_order(seed.into());
        }
        Ok(count)
    }

    // === Test Helpers ===

    /// Number of stored payments across all orders.
    pub fn payment_count(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .payments
            .len()
    }

    /// Payments of one order, oldest first.
    pub fn payments_for_order(&self, order_id: OrderId) -> Vec<Payment> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .payments
            .values()
            .filter(|payment| payment.order_id == order_id)
            .cloned()
            .collect()
    }

    /// Every ledger entry, oldest first.
    pub fn stock_transactions(&self) -> Vec<StockTransaction> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .stock
            .clone()
    }
}

#[async_trait]
impl OrderRepository for InMemoryShopStore {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let tables = self.tables.read().map_err(poisoned)?;
        Ok(tables.orders.get(&id).cloned())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryShopStore {
    async fn create(&self, payment: NewPayment) -> Result<Payment, DomainError> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        tables.next_payment_id += 1;
        let id = PaymentId::new(tables.next_payment_id);
        let payment = payment.into_payment(id, Timestamp::now());
        tables.payments.insert(id, payment.clone());
        Ok(payment)
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        match tables.payments.get_mut(&payment.id) {
            Some(stored) => {
                *stored = payment.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment {} not found", payment.id),
            )),
        }
    }

    async fn find_in_order(
        &self,
        order_id: OrderId,
        payment_id: PaymentId,
    ) -> Result<Option<Payment>, DomainError> {
        let tables = self.tables.read().map_err(poisoned)?;
        Ok(tables
            .payments
            .get(&payment_id)
            .filter(|payment| payment.order_id == order_id)
            .cloned())
    }
}

#[async_trait]
impl StockLedger for InMemoryShopStore {
    async fn record(
        &self,
        transaction: NewStockTransaction,
    ) -> Result<StockTransaction, DomainError> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        tables.next_stock_id += 1;
        let id = StockTransactionId::new(tables.next_stock_id);
        let entry = transaction.into_transaction(id, Timestamp::now());
        tables.stock.push(entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stock::{StockMovement, StockTransactionKind};

    fn order(id: i64) -> Order {
        Order::new(
            OrderId::new(id),
            "CHF",
            BigDecimal::from(25),
            vec![OrderItem {
                product_id: 3,
                quantity: 2,
            }],
        )
    }

    #[tokio::test]
    async fn finds_inserted_orders() {
        let store = InMemoryShopStore::new();
        store.insert_order(order(1));

        assert!(store.find_by_id(OrderId::new(1)).await.unwrap().is_some());
        assert!(store.find_by_id(OrderId::new(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seeds_orders_from_json() {
        let store = InMemoryShopStore::new();

        let count = store
            .seed_orders_json(
                r#"[
                    {"id": 7, "currency": "CHF", "total": "30.00",
                     "items": [{"product_id": 1, "quantity": 2}]},
                    {"id": 8, "currency": "EUR", "total": "12.50", "paid": "12.50",
                     "items": []}
                ]"#,
            )
            .unwrap();

        assert_eq!(count, 2);
        let unpaid = store.find_by_id(OrderId::new(7)).await.unwrap().unwrap();
        assert_eq!(unpaid.balance_remaining(), "30.00".parse::<BigDecimal>().unwrap());
        assert_eq!(unpaid.items.len(), 1);
        let paid = store.find_by_id(OrderId::new(8)).await.unwrap().unwrap();
        assert!(paid.is_paid());
    }

    #[tokio::test]
    async fn malformed_seed_inserts_nothing() {
        let store = InMemoryShopStore::new();

        let result = store.seed_orders_json(r#"[{"id": 7, "currency": "CHF"}]"#);

        assert!(result.is_err());
        assert!(store.find_by_id(OrderId::new(7)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn assigns_sequential_payment_ids() {
        let store = InMemoryShopStore::new();
        let first = store.create(NewPayment::for_balance(&order(1))).await.unwrap();
        let second = store.create(NewPayment::for_balance(&order(1))).await.unwrap();

        assert_eq!(first.id, PaymentId::new(1));
        assert_eq!(second.id, PaymentId::new(2));
        assert_eq!(store.payment_count(), 2);
    }

    #[tokio::test]
    async fn payment_lookup_is_scoped_to_order() {
        let store = InMemoryShopStore::new();
        let payment = store.create(NewPayment::for_balance(&order(1))).await.unwrap();

        let found = store
            .find_in_order(OrderId::new(1), payment.id)
            .await
            .unwrap();
        let other = store
            .find_in_order(OrderId::new(2), payment.id)
            .await
            .unwrap();

        assert_eq!(found, Some(payment));
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn update_overwrites_stored_payment() {
        let store = InMemoryShopStore::new();
        let mut payment = store.create(NewPayment::for_balance(&order(1))).await.unwrap();
        payment.notes = Some("Authorized".to_string());

        store.update(&payment).await.unwrap();

        let stored = store.payments_for_order(OrderId::new(1));
        assert_eq!(stored[0].notes.as_deref(), Some("Authorized"));
    }

    #[tokio::test]
    async fn update_of_unknown_payment_fails() {
        let store = InMemoryShopStore::new();
        let payment = NewPayment::for_balance(&order(1))
            .into_payment(PaymentId::new(99), Timestamp::now());

        let err = store.update(&payment).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentNotFound);
    }

    #[tokio::test]
    async fn ledger_appends_in_order() {
        let store = InMemoryShopStore::new();
        let order = order(1);
        let payment_id = PaymentId::new(1);

        store
            .record(NewStockTransaction::for_order(&order, payment_id, StockMovement::Reserve))
            .await
            .unwrap();
        store
            .record(NewStockTransaction::for_order(&order, payment_id, StockMovement::Release))
            .await
            .unwrap();

        let entries = store.stock_transactions();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, StockTransactionId::new(1));
        assert_eq!(entries[0].net_change(), -2);
        assert_eq!(entries[1].kind, StockTransactionKind::PaymentProcessReservation);
        assert_eq!(entries[1].net_change(), 2);
    }
}
