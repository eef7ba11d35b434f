//! Attach tags and custom properties to entities found by a query

use futures::TryStreamExt;
use navigator_client::{
    CustomMetadata, Entity, EntityRecord, HdfsEntity, HiveTable, Marker, MetadataService,
    NavigatorResult, WriteResult,
};
use tracing::{info, instrument};

use crate::report::{Reporter, NO_ELEMENTS_FOUND};

/// Which update entity to build from a queried record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// HDFS file or directory, keyed by `fileSystemPath`
    Hdfs,
    /// Hive table, keyed by database and table name
    HiveTable,
}

/// Custom metadata to merge onto an entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagUpdate {
    pub metadata: CustomMetadata,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl TagUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.metadata.add_tag(tag);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.add_property(key, value);
        self
    }

    /// Display name; only HDFS entities carry one
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Description; only HDFS entities carry one
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Build the update entity for `target` with `update` merged in
///
/// Identity fields come from the record. Tags are unioned and properties
/// overwrite per key.
pub fn build_entity(target: &EntityRecord, kind: TargetKind, update: &TagUpdate) -> NavigatorResult<Entity> {
    let mut entity: Entity = match kind {
        TargetKind::Hdfs => {
            let mut entity = HdfsEntity::from_record(target)?;
            if let Some(name) = &update.name {
                entity = entity.with_name(name.clone());
            }
            if let Some(description) = &update.description {
                entity = entity.with_description(description.clone());
            }
            entity.into()
        }
        TargetKind::HiveTable => HiveTable::from_record(target)?.into(),
    };

    let metadata = entity.metadata_mut();
    metadata.add_tags(update.metadata.tags.iter().cloned());
    metadata.add_properties(update.metadata.properties.clone());
    Ok(entity)
}

/// Submits tag/property updates through a [`MetadataService`]
pub struct EntityUpdater<'a> {
    service: &'a dyn MetadataService,
}

impl<'a> EntityUpdater<'a> {
    pub fn new(service: &'a dyn MetadataService) -> Self {
        Self { service }
    }

    /// Build and write one update for `target`
    ///
    /// A write the service rejects is returned as `NavigatorError::Write`;
    /// nothing is retried.
    #[instrument(skip(self, target, update), fields(source_id = ?target.source_id))]
    pub async fn update(
        &self,
        target: &EntityRecord,
        kind: TargetKind,
        update: &TagUpdate,
    ) -> NavigatorResult<WriteResult> {
        let entity = build_entity(target, kind, update)?;
        let result = self.service.write(&entity).await?.into_result()?;
        info!(entity = %entity.display_name(), "Entity updated");
        Ok(result)
    }

    /// Query for a target and update the first match
    ///
    /// Returns `None`, after reporting it, when the query matches nothing.
    pub async fn find_and_update(
        &self,
        marker: Option<&Marker>,
        query: &str,
        kind: TargetKind,
        update: &TagUpdate,
        reporter: &mut dyn Reporter,
    ) -> NavigatorResult<Option<WriteResult>> {
        let mut entities = self.service.extract_metadata(marker, query).await?.into_entities();
        let Some(target) = entities.try_next().await? else {
            reporter.report(NO_ELEMENTS_FOUND);
            return Ok(None);
        };
        drop(entities);

        self.update(&target, kind, update).await.map(Some)
    }
}
