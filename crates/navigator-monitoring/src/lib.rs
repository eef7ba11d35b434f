//! Logging setup shared by the Navigator extraction programs.

pub mod logging;

pub use logging::{init_logging, init_test_tracing, LogExt};

/// Configuration for initializing logging
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    /// Service name recorded with every log line
    pub service_name: String,
    /// Log level filter (e.g., "info,navigator_client=debug")
    pub log_filter: String,
    /// Emit JSON instead of human-readable lines
    pub enable_json_logging: bool,
    /// Also write JSON logs to this file, rotated daily
    pub log_file: Option<String>,
}

impl MonitoringConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Self::default()
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            service_name: "navigator-extraction".to_string(),
            log_filter: "info".to_string(),
            enable_json_logging: false,
            log_file: None,
        }
    }
}
