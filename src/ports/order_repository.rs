//! Order repository port (read side).
//!
//! The shop owns orders. The gateway only needs to look them up.

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::order::Order;
use async_trait::async_trait;

/// Lookup of shop orders by id.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order by its id.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn OrderRepository) {}
    }
}
