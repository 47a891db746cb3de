//! PostFinance Gateway - Hosted payment page integration for a shop.
//!
//! Builds signed redirect requests when a customer confirms an order, and
//! processes the provider's IPN callbacks to update payments and stock.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
