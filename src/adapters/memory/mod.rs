//! In-memory adapters.

mod shop_store;

pub use shop_store::InMemoryShopStore;
