use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use postfinance_gateway::adapters::http::{postfinance_router, PostfinanceAppState};
use postfinance_gateway::adapters::{
    InMemoryShopStore, PostgresOrderRepository, PostgresPaymentRepository, PostgresStockLedger,
};
use postfinance_gateway::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    // RUST_LOG wins over the configured directive
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let state = match &config.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .acquire_timeout(database.acquire_timeout())
                .connect(&database.url)
                .await?;

            if database.run_migrations {
                tracing::info!("running database migrations");
                sqlx::migrate!("./migrations").run(&pool).await?;
            }

            PostfinanceAppState {
                orders: Arc::new(PostgresOrderRepository::new(pool.clone())),
                payments: Arc::new(PostgresPaymentRepository::new(pool.clone())),
                stock: Arc::new(PostgresStockLedger::new(pool)),
                config: config.postfinance.clone(),
            }
        }
        None => {
            tracing::warn!("no database configured, using in-memory store");
            let store = Arc::new(InMemoryShopStore::new());
            if let Some(path) = &config.memory.seed_orders_file {
                let json = std::fs::read_to_string(path)?;
                let orders = store.seed_orders_json(&json)?;
                tracing::info!(path = %path.display(), orders, "seeded in-memory orders");
            }
            PostfinanceAppState {
                orders: store.clone(),
                payments: store.clone(),
                stock: store,
                config: config.postfinance.clone(),
            }
        }
    };

    let app = postfinance_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(config.server.request_timeout())),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        mode = config.postfinance.mode().as_str(),
        pspid = %config.postfinance.pspid,
        "postfinance gateway listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
