//! HTTP adapter for the PostFinance hosted payment page.

mod form_page;
mod handlers;
mod routes;

pub use form_page::render_form_page;
pub use handlers::{
    confirm_order, handle_ipn, health, CheckoutApiError, IpnApiError, PostfinanceAppState,
};
pub use routes::{postfinance_router, postfinance_routes};
