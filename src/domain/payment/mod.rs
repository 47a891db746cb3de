//! Payment domain module.
//!
//! Speaks the PostFinance hosted payment page protocol.
//!
//! # Module Structure
//!
//! - `aggregate` - Payment entity and its callback update rules
//! - `errors` - IPN and checkout error taxonomy
//! - `notification` - Parsed IPN callback
//! - `order_reference` - `Order-<orderId>-<paymentId>` encoding
//! - `request` - Signed outbound parameter set
//! - `signature` - SHA digests and comparison
//! - `status` - Provider status code table

mod aggregate;
mod errors;
mod notification;
mod order_reference;
mod request;
mod signature;
mod status;

pub use aggregate::{NewPayment, Payment, PAYMENT_MODULE};
pub use errors::{CheckoutError, IpnError};
pub use notification::{fields, IpnNotification};
pub use order_reference::OrderReference;
pub use request::{GatewayMode, PaymentRequest, PROD_GATEWAY_URL, TEST_GATEWAY_URL};
pub use signature::{signatures_match, ShaAlgorithm};
pub use status::{describe as describe_status, StatusCode, AUTHORIZED};

#[cfg(test)]
pub use notification::signed_test_fields;
