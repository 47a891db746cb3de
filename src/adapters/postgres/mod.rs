//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresOrderRepository` - Shop orders and their items
//! - `PostgresPaymentRepository` - Payments attached to orders
//! - `PostgresStockLedger` - Append-only inventory ledger

mod order_repository;
mod payment_repository;
mod stock_ledger;

pub use order_repository::PostgresOrderRepository;
pub use payment_repository::PostgresPaymentRepository;
pub use stock_ledger::PostgresStockLedger;
