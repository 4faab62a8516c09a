//! Product pipeline entry point.
//!
//! Converts `Productos/` into `ProductosOptimized/` (resolved relative to
//! the current working directory). Images only: video extensions fall
//! through to the verbatim-copy route. Configuration is the fixed
//! images-only preset; there are no command-line flags.

use anyhow::Result;
use tracing::info;

use web_asset_optimizer::{Config, MediaOptimizer};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Web asset optimizer - Productos → ProductosOptimized");

    let root = std::env::current_dir()?;
    let optimizer = MediaOptimizer::new(
        root.join("Productos"),
        root.join("ProductosOptimized"),
        Config::images_only(),
    )?;
    optimizer.run().await?;

    Ok(())
}
