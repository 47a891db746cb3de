//! PostgreSQL implementation of OrderRepository.
//!
//! Reads shop orders and their line items. Decimal columns are selected as
//! text and parsed into `BigDecimal`.

use std::str::FromStr;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, Timestamp};
use crate::domain::order::{Order, OrderItem};
use crate::ports::OrderRepository;

/// PostgreSQL implementation of the OrderRepository port.
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    currency: String,
    total: String,
    paid: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    product_id: i64,
    quantity: i32,
}

/// Parses a `NUMERIC` column that was selected as text.
pub(super) fn parse_numeric(column: &str, value: &str) -> Result<BigDecimal, DomainError> {
    BigDecimal::from_str(value).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value '{}': {}", column, value, e),
        )
    })
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, currency, total::text AS total, paid::text AS paid, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find order: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT product_id, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load order items: {}", e)))?;

        Ok(Some(Order {
            id: OrderId::new(row.id),
            currency: row.currency,
            total: parse_numeric("total", &row.total)?,
            paid: parse_numeric("paid", &row.paid)?,
            items: items
                .into_iter()
                .map(|item| OrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
            created_at: Timestamp::from_datetime(row.created_at),
        }))
    }
}
