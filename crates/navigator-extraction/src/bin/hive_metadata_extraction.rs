//! Tag the `cart_items` table and extract Hive metadata

use anyhow::Context;
use clap::Parser;
use navigator_client::{NavigatorConfig, NavigatorPlugin};
use navigator_extraction::cli::{load_marker, HiveArgs};
use navigator_extraction::{run_hive, write_marker, ConsoleReporter};
use navigator_monitoring::{init_logging, LogExt};
use tracing::info;

const SERVICE_NAME: &str = "hive-metadata-extraction";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = HiveArgs::parse();

    let config = NavigatorConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    init_logging(&args.logging.monitoring_config(SERVICE_NAME, &config))?;

    let plugin = NavigatorPlugin::new(config).context("Failed to connect to Navigator")?;
    let marker = load_marker(args.marker_in.as_deref()).await?;

    let outcome = run_hive(&plugin, marker.as_ref(), &mut ConsoleReporter)
        .await
        .log_err("Hive extraction stopped")
        .context("Hive extraction failed")?;

    write_marker(&args.marker_out, &outcome.marker)
        .await
        .with_context(|| format!("Failed to write marker to {}", args.marker_out.display()))?;

    info!(updated = outcome.update.is_some(), "Hive extraction finished");
    Ok(())
}
