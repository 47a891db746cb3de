//! Strongly-typed identifier value objects.
//!
//! Orders and payments are keyed by store-assigned integers. The provider's
//! order reference embeds both ids as decimal numbers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier for a shop order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    /// Creates an OrderId from a raw database key.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw key.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for a payment attempt on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(i64);

impl PaymentId {
    /// Creates a PaymentId from a raw database key.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw key.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PaymentId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for a stock ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockTransactionId(i64);

impl StockTransactionId {
    /// Creates a StockTransactionId from a raw database key.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw key.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for StockTransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
