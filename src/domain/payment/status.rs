//! PostFinance transaction status codes.
//!
//! The provider reports payment state as a numeric code in the `STATUS`
//! field. The table below mirrors the provider's published status list and
//! is built once, on first lookup.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Status code reported when the payment has been authorized.
pub const AUTHORIZED: &str = "5";

const STATUS_DESCRIPTIONS: &[(&str, &str)] = &[
    ("0", "Incomplete or invalid"),
    ("1", "Cancelled by client"),
    ("2", "Authorization refused"),
    ("4", "Order stored"),
    ("41", "Waiting client payment"),
    ("5", "Authorized"),
    ("51", "Authorization waiting"),
    ("52", "Authorization not known"),
    ("55", "Stand-by"),
    ("59", "Authoriz. to get manually"),
    ("6", "Authorized and cancelled"),
    ("61", "Author. deletion waiting"),
    ("62", "Author. deletion uncertain"),
    ("63", "Author. deletion refused"),
    ("64", "Authorized and cancelled"),
    ("7", "Payment deleted"),
    ("71", "Payment deletion pending"),
    ("72", "Payment deletion uncertain"),
    ("73", "Payment deletion refused"),
    ("74", "Payment deleted"),
    ("75", "Deletion processed by merchant"),
    ("8", "Refund"),
    ("81", "Refund pending"),
    ("82", "Refund uncertain"),
    ("83", "Refund refused"),
    ("84", "Payment declined by the acquirer"),
    ("85", "Refund processed by merchant"),
    ("9", "Payment requested"),
    ("91", "Payment processing"),
    ("92", "Payment uncertain"),
    ("93", "Payment refused"),
    ("94", "Refund declined by the acquirer"),
    ("95", "Payment processed by merchant"),
    ("99", "Being processed"),
];

static STATUS_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| STATUS_DESCRIPTIONS.iter().copied().collect());

/// Raw status code as received from the provider.
///
/// Unknown codes are kept verbatim; they simply have no description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(String);

impl StatusCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human readable description, if the code is in the provider table.
    pub fn description(&self) -> Option<&'static str> {
        describe(&self.0)
    }

    /// Whether this code means the payment was authorized.
    pub fn is_authorized(&self) -> bool {
        self.0 == AUTHORIZED
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Looks up the description for a raw status code.
pub fn describe(code: &str) -> Option<&'static str> {
    STATUS_TABLE.get(code).copied()
}
