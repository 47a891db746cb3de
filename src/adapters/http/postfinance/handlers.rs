//! HTTP handlers for the PostFinance endpoints.
//!
//! These handlers connect Axum routes to the checkout and IPN command handlers.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::application::handlers::payment::{
    ConfirmOrderCommand, ConfirmOrderHandler, ConfirmOrderResult, HandleIpnCommand,
    HandleIpnHandler,
};
use crate::config::PostfinanceConfig;
use crate::domain::foundation::OrderId;
use crate::domain::payment::{CheckoutError, IpnError};
use crate::ports::{OrderRepository, PaymentRepository, StockLedger};

use super::form_page::render_form_page;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the PostFinance routes.
#[derive(Clone)]
pub struct PostfinanceAppState {
    pub orders: Arc<dyn OrderRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub stock: Arc<dyn StockLedger>,
    pub config: PostfinanceConfig,
}

impl PostfinanceAppState {
    pub fn confirm_order_handler(&self) -> ConfirmOrderHandler {
        ConfirmOrderHandler::new(
            self.orders.clone(),
            self.payments.clone(),
            self.stock.clone(),
            self.config.clone(),
        )
    }

    pub fn ipn_handler(&self) -> HandleIpnHandler {
        HandleIpnHandler::new(
            self.orders.clone(),
            self.payments.clone(),
            self.stock.clone(),
            self.config.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /payment/postfinance/orders/:order_id/confirm - Start a hosted-page payment
pub async fn confirm_order(
    State(state): State<PostfinanceAppState>,
    Path(order_id): Path<i64>,
) -> Result<Response, CheckoutApiError> {
    let cmd = ConfirmOrderCommand {
        order_id: OrderId::new(order_id),
    };

    match state.confirm_order_handler().handle(cmd).await? {
        ConfirmOrderResult::AlreadyPaid { redirect_to } => {
            Ok(Redirect::to(&redirect_to).into_response())
        }
        ConfirmOrderResult::PaymentRequested(request) => {
            Ok(Html(render_form_page(&request)).into_response())
        }
    }
}

/// POST /payment/postfinance/ipn/ - Provider callback
///
/// Not authenticated at the transport level; the signature is the only proof
/// of origin.
pub async fn handle_ipn(
    State(state): State<PostfinanceAppState>,
    body: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<impl IntoResponse, IpnApiError> {
    let Form(fields) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable callback body");
        IpnError::MissingData("body")
    })?;

    state.ipn_handler().handle(HandleIpnCommand { fields }).await?;

    Ok((StatusCode::OK, "OK"))
}

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "OK"
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Converts IPN failures into the terse responses the provider expects.
#[derive(Debug)]
pub struct IpnApiError(IpnError);

impl From<IpnError> for IpnApiError {
    fn from(err: IpnError) -> Self {
        Self(err)
    }
}

impl IntoResponse for IpnApiError {
    fn into_response(self) -> Response {
        if self.0.is_internal() {
            tracing::error!(error = %self.0, "postfinance callback failed");
        } else {
            tracing::warn!(error = %self.0, "postfinance callback rejected");
        }
        (self.0.status_code(), self.0.public_message()).into_response()
    }
}

/// Converts checkout failures into HTTP responses.
#[derive(Debug)]
pub struct CheckoutApiError(CheckoutError);

impl From<CheckoutError> for CheckoutApiError {
    fn from(err: CheckoutError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> Response {
        let body = match &self.0 {
            CheckoutError::OrderNotFound(_) => "Order not found",
            CheckoutError::Infrastructure(_) => {
                tracing::error!(error = %self.0, "checkout failed");
                ""
            }
        };
        (self.0.status_code(), body).into_response()
    }
}
