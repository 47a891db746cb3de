//! Order domain module.
//!
//! Read-side view of shop orders: outstanding balance and stock lines.

mod aggregate;

pub use aggregate::{Order, OrderItem};
