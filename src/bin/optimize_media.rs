//! Media pipeline entry point.
//!
//! Converts `Servicios/` into `ServiciosOptimized/` (resolved relative to
//! the current working directory): images become WebP at quality 75 within
//! 1920x1080, videos become 720p H.264/AAC at CRF 28, everything else is
//! copied verbatim. Configuration is the fixed media preset; there are no
//! command-line flags.

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

    info!("🚀 Web asset optimizer - Servicios → ServiciosOptimized");

    let root = std::env::current_dir()?;
    let optimizer = MediaOptimizer::new(
        root.join("Servicios"),
        root.join("ServiciosOptimized"),
        Config::media(),
    )?;
    optimizer.run().await?;

    Ok(())
}
