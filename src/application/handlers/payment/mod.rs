//! PostFinance payment handlers.

mod confirm_order;
mod handle_ipn;

pub use confirm_order::{ConfirmOrderCommand, ConfirmOrderHandler, ConfirmOrderResult};
pub use handle_ipn::{HandleIpnCommand, HandleIpnHandler, HandleIpnResult};
