//! Configuration for the Navigator client
//!
//! Connection and auth parameters are read from a file whose path the caller
//! supplies, then overridden from `NAVIGATOR_*` environment variables.

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::error::{NavigatorError, NavigatorResult};

/// Prefix for environment overrides, e.g. `NAVIGATOR_PASSWORD`
pub const ENV_PREFIX: &str = "NAVIGATOR";

/// Navigator client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// Base URL of the Navigator service, e.g. `http://nav-host:7187`
    #[serde(default)]
    pub navigator_url: String,

    /// REST API version used to build endpoint paths
    #[serde(default = "default_api_version")]
    pub navigator_api_version: u32,

    /// Basic auth user
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(default)]
    pub password: Option<String>,

    /// Namespace attached to custom metadata written by this client
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Page size used when iterating query results
    #[serde(default = "default_batch_size")]
    pub extractor_batch_size: usize,

    /// Per-request timeout; transport default when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Accept invalid TLS certificates
    #[serde(default)]
    pub disable_ssl_validation: bool,

    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_version() -> u32 {
    9
}

fn default_namespace() -> String {
    "partner".to_string()
}

fn default_batch_size() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl NavigatorConfig {
    /// Load configuration from a file, then apply environment overrides
    ///
    /// The format follows the file extension; `.conf`, `.properties` and
    /// extension-less files are read as `key=value` lines.
    pub fn from_file(path: impl AsRef<Path>) -> NavigatorResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(NavigatorError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let path_str = path.to_str().ok_or_else(|| {
            NavigatorError::Config(format!("Config path is not valid UTF-8: {}", path.display()))
        })?;

        let settings = Config::builder()
            .add_source(File::new(path_str, format_for(path)).required(true))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: NavigatorConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration for the given service URL with defaults elsewhere
    pub fn new(navigator_url: impl Into<String>) -> Self {
        Self {
            navigator_url: navigator_url.into(),
            ..Self::default()
        }
    }

    /// Set basic auth credentials
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the result page size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.extractor_batch_size = batch_size;
        self
    }

    /// Check required fields and field combinations
    pub fn validate(&self) -> NavigatorResult<()> {
        if self.navigator_url.trim().is_empty() {
            return Err(NavigatorError::Config("navigator_url is required".to_string()));
        }

        reqwest::Url::parse(&self.navigator_url).map_err(|e| {
            NavigatorError::Config(format!("Invalid navigator_url '{}': {}", self.navigator_url, e))
        })?;

        if self.extractor_batch_size == 0 {
            return Err(NavigatorError::Config(
                "extractor_batch_size must be greater than zero".to_string(),
            ));
        }

        match (&self.username, &self.password) {
            (Some(_), None) => {
                return Err(NavigatorError::Config("username given without password".to_string()))
            }
            (None, Some(_)) => {
                return Err(NavigatorError::Config("password given without username".to_string()))
            }
            (None, None) => warn!("No credentials configured - requests will be unauthenticated"),
            (Some(_), Some(_)) => {}
        }

        if self.disable_ssl_validation {
            warn!("TLS certificate validation is disabled");
        }

        Ok(())
    }

    /// Versioned API root, e.g. `http://nav-host:7187/api/v9`
    pub fn api_url(&self) -> String {
        format!(
            "{}/api/v{}",
            self.navigator_url.trim_end_matches('/'),
            self.navigator_api_version
        )
    }

    /// Request timeout, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            navigator_url: String::new(),
            navigator_api_version: default_api_version(),
            username: None,
            password: None,
            namespace: default_namespace(),
            extractor_batch_size: default_batch_size(),
            request_timeout_secs: None,
            disable_ssl_validation: false,
            log_level: default_log_level(),
        }
    }
}

fn format_for(path: &Path) -> FileFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => FileFormat::Toml,
        Some("json") => FileFormat::Json,
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        _ => FileFormat::Ini,
    }
}
