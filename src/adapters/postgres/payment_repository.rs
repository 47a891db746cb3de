//! PostgreSQL implementation of PaymentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, PaymentId, Timestamp};
use crate::domain::payment::{NewPayment, Payment};
use crate::ports::PaymentRepository;

use super::order_repository::parse_numeric;

/// PostgreSQL implementation of the PaymentRepository port.
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    order_id: i64,
    currency: String,
    amount: String,
    payment_module: String,
    payment_method: Option<String>,
    transaction_id: Option<String>,
    notes: Option<String>,
    data: serde_json::Value,
    authorized: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: PaymentId::new(row.id),
            order_id: OrderId::new(row.order_id),
            currency: row.currency,
            amount: parse_numeric("amount", &row.amount)?,
            payment_module: row.payment_module,
            payment_method: row.payment_method,
            transaction_id: row.transaction_id,
            notes: row.notes,
            data: row.data,
            authorized: row.authorized.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_PAYMENT: &str = r#"
    SELECT id, order_id, currency, amount::text AS amount, payment_module,
           payment_method, transaction_id, notes, data, authorized,
           created_at, updated_at
    FROM payments
"#;

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn create(&self, payment: NewPayment) -> Result<Payment, DomainError> {
        let now = Timestamp::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO payments (
                order_id, currency, amount, payment_module, data, created_at, updated_at
            ) VALUES ($1, $2, $3::numeric, $4, 'null'::jsonb, $5, $5)
            RETURNING id
            "#,
        )
        .bind(payment.order_id.as_i64())
        .bind(&payment.currency)
        .bind(payment.amount.to_string())
        .bind(&payment.payment_module)
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to create payment: {}", e)))?;

        Ok(payment.into_payment(PaymentId::new(id), now))
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                currency = $2,
                amount = $3::numeric,
                payment_method = $4,
                transaction_id = $5,
                notes = $6,
                data = $7,
                authorized = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(payment.id.as_i64())
        .bind(&payment.currency)
        .bind(payment.amount.to_string())
        .bind(&payment.payment_method)
        .bind(&payment.transaction_id)
        .bind(&payment.notes)
        .bind(&payment.data)
        .bind(payment.authorized.as_ref().map(|t| *t.as_datetime()))
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update payment: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment {} not found", payment.id),
            ));
        }

        Ok(())
    }

    async fn find_in_order(
        &self,
        order_id: OrderId,
        payment_id: PaymentId,
    ) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> =
            sqlx::query_as(&format!("{} WHERE id = $1 AND order_id = $2", SELECT_PAYMENT))
                .bind(payment_id.as_i64())
                .bind(order_id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to find payment: {}", e)))?;

        row.map(Payment::try_from).transpose()
    }
}
