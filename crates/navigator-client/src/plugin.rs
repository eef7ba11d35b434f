//! Entry point tying configuration, extraction and writes together

use std::path::Path;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::client::NavApiClient;
use crate::config::NavigatorConfig;
use crate::entity::Entity;
use crate::error::NavigatorResult;
use crate::extractor::{MetadataExtractor, MetadataResultSet};
use crate::marker::Marker;
use crate::model::{Source, SourceType};
use crate::writer::WriteResult;

/// Operations a metadata workflow needs from the catalog service
///
/// Implemented by [`NavigatorPlugin`] against the REST API; tests substitute
/// in-memory fakes.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Entities matching `query`, limited to changes after `marker` if given
    async fn extract_metadata(
        &self,
        marker: Option<&Marker>,
        query: &str,
    ) -> NavigatorResult<MetadataResultSet>;

    /// The single registered source of a type
    async fn only_source(&self, source_type: SourceType) -> NavigatorResult<Source>;

    /// Submit one entity; service-side rejections come back inside the result
    async fn write(&self, entity: &Entity) -> NavigatorResult<WriteResult>;
}

/// Navigator service handle built from a configuration file
#[derive(Debug, Clone)]
pub struct NavigatorPlugin {
    client: NavApiClient,
    extractor: MetadataExtractor,
}

impl NavigatorPlugin {
    /// Load configuration from `path` and connect
    pub fn from_config_file(path: impl AsRef<Path>) -> NavigatorResult<Self> {
        Self::new(NavigatorConfig::from_file(path)?)
    }

    /// Validate `config` and connect
    ///
    /// Logs the loaded configuration, so call it after logging is set up.
    pub fn new(config: NavigatorConfig) -> NavigatorResult<Self> {
        config.validate()?;
        info!(
            navigator_url = %config.navigator_url,
            api_version = config.navigator_api_version,
            namespace = %config.namespace,
            "Loaded navigator configuration"
        );
        let client = NavApiClient::new(config)?;
        let extractor = MetadataExtractor::new(client.clone());
        Ok(Self { client, extractor })
    }

    pub fn client(&self) -> &NavApiClient {
        &self.client
    }

    pub fn extractor(&self) -> &MetadataExtractor {
        &self.extractor
    }

    pub fn config(&self) -> &NavigatorConfig {
        self.client.config()
    }
}

#[async_trait]
impl MetadataService for NavigatorPlugin {
    async fn extract_metadata(
        &self,
        marker: Option<&Marker>,
        query: &str,
    ) -> NavigatorResult<MetadataResultSet> {
        self.extractor.extract_metadata(marker, query).await
    }

    async fn only_source(&self, source_type: SourceType) -> NavigatorResult<Source> {
        self.client.only_source(source_type).await
    }

    #[instrument(skip(self, entity), fields(entity = %entity.display_name()))]
    async fn write(&self, entity: &Entity) -> NavigatorResult<WriteResult> {
        let namespace = &self.config().namespace;
        if entity.has_namespace() || namespace.is_empty() {
            return self.client.write_entity(entity).await;
        }

        let mut entity = entity.clone();
        entity.default_namespace(namespace);
        self.client.write_entity(&entity).await
    }
}
