//! Stock ledger port.
//!
//! Append-only. Entries are never updated or removed.

use crate::domain::foundation::DomainError;
use crate::domain::stock::{NewStockTransaction, StockTransaction};
use async_trait::async_trait;

/// Inventory ledger shared with the shop.
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Append one entry (with all of its lines).
    async fn record(&self, transaction: NewStockTransaction)
        -> Result<StockTransaction, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_ledger_is_object_safe() {
        fn _accepts_dyn(_ledger: &dyn StockLedger) {}
    }
}
