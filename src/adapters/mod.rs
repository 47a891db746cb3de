//! Adapters - Implementations of port interfaces.
//!
//! - `http` - Axum endpoints for checkout and provider callbacks
//! - `memory` - In-memory store (no database configured, tests)
//! - `postgres` - PostgreSQL repositories

pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::InMemoryShopStore;
pub use postgres::{PostgresOrderRepository, PostgresPaymentRepository, PostgresStockLedger};
