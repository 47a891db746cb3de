//! Stock domain module.
//!
//! Append-only inventory ledger entries tied to payments.

mod transaction;

pub use transaction::{
    NewStockTransaction, StockLine, StockMovement, StockTransaction, StockTransactionKind,
};
