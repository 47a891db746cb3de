//! In-memory store configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Settings used only when no database section is configured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryStoreConfig {
    /// JSON array of orders loaded into the store at startup
    pub seed_orders_file: Option<PathBuf>,
}
