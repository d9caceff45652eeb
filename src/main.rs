//! File catalog - command line entry point
//!
//! Loads configuration (optional path in the first argument), seeds the
//! catalog on first run, verifies it and prints the ordered listing as JSON.

use file_catalog::{init_logging, CatalogConfig, CatalogStore};
use std::path::PathBuf;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = CatalogConfig::load(config_path.as_deref())?;

    let _log_guard = init_logging(&config.logging)?;
    info!("File catalog v{} starting", env!("CARGO_PKG_VERSION"));

    let store = CatalogStore::open(&config.database).await?;

    let seeded = store.seed_from_dir(&config.seed).await?;
    if seeded > 0 {
        info!(count = seeded, "Catalog seeded");
    }

    let report = store.verify_integrity().await?;
    if !report.is_valid() {
        warn!(errors = report.error_count(), "Catalog has integrity problems");
    }

    let entries = store.list_all().await?;
    info!(
        entries = entries.len(),
        total_bytes = store.total_size().await?,
        "Catalog loaded"
    );
    println!("{}", serde_json::to_string_pretty(&entries)?);

    store.close().await;
    Ok(())
}
