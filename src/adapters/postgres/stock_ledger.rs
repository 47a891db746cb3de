//! PostgreSQL implementation of StockLedger.
//!
//! Each entry is a `stock_transactions` row plus one
//! `stock_transaction_lines` row per product, written in one transaction.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, StockTransactionId, Timestamp};
use crate::domain::stock::{NewStockTransaction, StockTransaction};
use crate::ports::StockLedger;

/// PostgreSQL implementation of the StockLedger port.
pub struct PostgresStockLedger {
    pool: PgPool,
}

impl PostgresStockLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StockLedger for PostgresStockLedger {
    async fn record(
        &self,
        transaction: NewStockTransaction,
    ) -> Result<StockTransaction, DomainError> {
        let now = Timestamp::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to begin transaction: {}", e)))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO stock_transactions (order_id, payment_id, kind, notes, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(transaction.order_id.as_i64())
        .bind(transaction.payment_id.as_i64())
        .bind(transaction.kind.as_str())
        .bind(&transaction.notes)
        .bind(now.as_datetime())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to record stock transaction: {}", e)))?;

        for line in &transaction.lines {
            sqlx::query(
                r#"
                INSERT INTO stock_transaction_lines (transaction_id, product_id, change)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(id)
            .bind(line.product_id)
            .bind(line.change)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to record stock line: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit stock transaction: {}", e)))?;

        Ok(transaction.into_transaction(StockTransactionId::new(id), now))
    }
}
