//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, money, errors)
//! - `order` - Read-side view of shop orders
//! - `payment` - PostFinance protocol: signatures, status codes, payments
//! - `stock` - Inventory ledger entries

pub mod foundation;
pub mod order;
pub mod payment;
pub mod stock;
