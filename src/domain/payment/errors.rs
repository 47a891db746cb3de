//! Error types for PostFinance checkout and IPN handling.
//!
//! Almost every IPN failure is a 403 for the provider. Only the server log
//! tells the cases apart.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, OrderId};

/// Errors that occur while processing an IPN callback.
#[derive(Debug, Error)]
pub enum IpnError {
    /// A required callback field was absent (or the body was unreadable).
    #[error("Missing data: {0}")]
    MissingData(&'static str),

    /// The recomputed signature does not match `SHASIGN`.
    #[error("Hash did not validate")]
    HashMismatch,

    /// `orderID` is not `<prefix>-<orderId>-<paymentId>`.
    #[error("Malformed order ID")]
    MalformedOrderId,

    /// The referenced order does not exist.
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    /// The callback amount is not a decimal number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Store or other unexpected failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IpnError {
    /// Maps the error to the HTTP status returned to the provider.
    pub fn status_code(&self) -> StatusCode {
        match self {
            IpnError::OrderNotFound(_) => StatusCode::NOT_FOUND,
            IpnError::MissingData(_)
            | IpnError::HashMismatch
            | IpnError::MalformedOrderId
            | IpnError::InvalidAmount(_)
            | IpnError::Internal(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Short diagnostic body sent to the provider.
    ///
    /// Unexpected failures get an empty body.
    pub fn public_message(&self) -> &'static str {
        match self {
            IpnError::MissingData(_) => "Missing data",
            IpnError::HashMismatch => "Hash did not validate",
            IpnError::MalformedOrderId => "Malformed order ID",
            IpnError::OrderNotFound(_) => "Order not found",
            IpnError::InvalidAmount(_) | IpnError::Internal(_) => "",
        }
    }

    /// Whether the failure is on our side rather than in the request.
    pub fn is_internal(&self) -> bool {
        matches!(self, IpnError::InvalidAmount(_) | IpnError::Internal(_))
    }
}

impl From<DomainError> for IpnError {
    fn from(err: DomainError) -> Self {
        IpnError::Internal(err.to_string())
    }
}

/// Errors that occur while building the outbound payment request.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl CheckoutError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckoutError::OrderNotFound(_) => StatusCode::NOT_FOUND,
            CheckoutError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for CheckoutError {
    fn from(err: DomainError) -> Self {
        CheckoutError::Infrastructure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    // ══════════════════════════════════════════════════════════════
    // Status Code Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn request_errors_are_forbidden() {
        assert_eq!(
            IpnError::MissingData("CARDNO").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(IpnError::HashMismatch.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            IpnError::MalformedOrderId.status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn internal_errors_are_forbidden_not_server_errors() {
        assert_eq!(
            IpnError::Internal("db down".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            IpnError::InvalidAmount("x".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn unknown_order_is_not_found() {
        assert_eq!(
            IpnError::OrderNotFound(OrderId::new(1)).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Body Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn missing_data_body_hides_field_name() {
        let err = IpnError::MissingData("CARDNO");
        assert_eq!(err.public_message(), "Missing data");
        assert_eq!(err.to_string(), "Missing data: CARDNO");
    }

    #[test]
    fn internal_error_body_is_empty() {
        let err = IpnError::Internal("connection refused".to_string());
        assert_eq!(err.public_message(), "");
        assert!(err.is_internal());
    }

    #[test]
    fn domain_error_becomes_internal() {
        let err: IpnError = DomainError::new(ErrorCode::DatabaseError, "boom").into();
        assert!(matches!(err, IpnError::Internal(_)));
    }

    #[test]
    fn checkout_not_found_maps_to_404() {
        assert_eq!(
            CheckoutError::OrderNotFound(OrderId::new(3)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CheckoutError::Infrastructure("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
