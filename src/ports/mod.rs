//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `OrderRepository` - Read access to shop orders
//! - `PaymentRepository` - Payment persistence
//! - `StockLedger` - Append-only inventory ledger

mod order_repository;
mod payment_repository;
mod stock_ledger;

pub use order_repository::OrderRepository;
pub use payment_repository::PaymentRepository;
pub use stock_ledger::StockLedger;
