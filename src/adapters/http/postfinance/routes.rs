//! Axum router configuration for the PostFinance endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{confirm_order, handle_ipn, health, PostfinanceAppState};

/// Create the PostFinance payment router.
///
/// # Routes
///
/// - `POST /ipn/` - Provider callback (no auth, signature verified)
/// - `POST /orders/:order_id/confirm` - Start a hosted-page payment
pub fn postfinance_routes() -> Router<PostfinanceAppState> {
    Router::new()
        .route("/ipn/", post(handle_ipn))
        .route("/orders/:order_id/confirm", post(confirm_order))
}

/// Create the complete application router.
///
/// Mounts the payment routes under `/payment/postfinance` next to `/health`.
///
/// # Example
///
/// ```ignore
/// let app = postfinance_router(state);
/// axum::serve(listener, app).await?;
/// ```
pub fn postfinance_router(state: PostfinanceAppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/payment/postfinance", postfinance_routes())
        .with_state(state)
}
