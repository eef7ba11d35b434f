//! Command-line arguments of the extraction programs

use std::path::{Path, PathBuf};

use navigator_client::{Marker, NavigatorConfig};
use navigator_monitoring::MonitoringConfig;

use crate::marker_file::read_marker;

/// Logging flags shared by both programs
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LoggingOptions {
    /// Emit logs as JSON lines
    #[arg(long, default_value_t = false)]
    pub json_logs: bool,

    /// Also write JSON logs to this file, rotated daily
    #[arg(long)]
    pub log_file: Option<String>,
}

impl LoggingOptions {
    /// Logging setup for `service_name`, filtered at the configured level
    pub fn monitoring_config(&self, service_name: &str, config: &NavigatorConfig) -> MonitoringConfig {
        MonitoringConfig {
            log_filter: config.log_level.clone(),
            enable_json_logging: self.json_logs,
            log_file: self.log_file.clone(),
            ..MonitoringConfig::new(service_name)
        }
    }
}

/// Extract and tag HDFS metadata
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "hdfs-metadata-extraction", version)]
pub struct HdfsArgs {
    /// Navigator configuration file
    pub config: PathBuf,

    /// Where to write the marker for the next run
    pub marker_out: Option<PathBuf>,

    /// File holding a marker from a previous run
    pub marker_in: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingOptions,
}

/// Extract and tag Hive metadata
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "hive-metadata-extraction", version)]
pub struct HiveArgs {
    /// Navigator configuration file
    pub config: PathBuf,

    /// Where to write the marker for the next run
    pub marker_out: PathBuf,

    /// File holding a marker from a previous run
    pub marker_in: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingOptions,
}

/// Read the input marker if a marker file was given
pub async fn load_marker(marker_in: Option<&Path>) -> navigator_client::NavigatorResult<Option<Marker>> {
    match marker_in {
        Some(path) => read_marker(path).await,
        None => Ok(None),
    }
}
