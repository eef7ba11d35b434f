//! Extract HDFS metadata and tag the `sample_07` file

use anyhow::Context;
use clap::Parser;
use navigator_client::{NavigatorConfig, NavigatorPlugin};
use navigator_extraction::cli::{load_marker, HdfsArgs};
use navigator_extraction::{run_hdfs, write_marker, ConsoleReporter};
use navigator_monitoring::{init_logging, LogExt};
use tracing::info;

const SERVICE_NAME: &str = "hdfs-metadata-extraction";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = HdfsArgs::parse();

    let config = NavigatorConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    init_logging(&args.logging.monitoring_config(SERVICE_NAME, &config))?;

    let plugin = NavigatorPlugin::new(config).context("Failed to connect to Navigator")?;
    let marker = load_marker(args.marker_in.as_deref()).await?;

    let outcome = run_hdfs(&plugin, marker.as_ref(), &mut ConsoleReporter)
        .await
        .log_err("HDFS extraction stopped")
        .context("HDFS extraction failed")?;

    if let Some(path) = &args.marker_out {
        write_marker(path, &outcome.marker)
            .await
            .with_context(|| format!("Failed to write marker to {}", path.display()))?;
    }

    info!(updated = outcome.update.is_some(), "HDFS extraction finished");
    Ok(())
}
