//! HTTP adapters - Axum endpoints.

pub mod postfinance;

pub use postfinance::{postfinance_router, PostfinanceAppState};
