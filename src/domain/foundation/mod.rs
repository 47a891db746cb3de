//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, money helpers, and error types
//! shared by the order, payment, and stock modules.

mod errors;
mod ids;
mod money;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{OrderId, PaymentId, StockTransactionId};
pub use money::{parse_amount, to_minor_units, MINOR_UNIT_SCALE};
pub use timestamp::Timestamp;
