//! Update entities submitted to the write endpoint
//!
//! Entities are always built from a queried [`EntityRecord`] so their identity
//! (`sourceId` plus type-specific fields) comes from the service, never from
//! the caller.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{NavigatorError, NavigatorResult};
use crate::model::{EntityRecord, EntityType};

/// Database assumed for tables whose record carries no parent path
pub const DEFAULT_HIVE_DATABASE: &str = "default";

/// Tags and custom properties attached to an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomMetadata {
    /// Unordered labels; adding an existing tag is a no-op
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Key/value properties; the last value written for a key wins
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl CustomMetadata {
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    /// Union the given tags into the set
    pub fn add_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
    }

    pub fn add_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Merge properties in iteration order, later keys replacing earlier ones
    pub fn add_properties<I, K, V>(&mut self, properties: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in properties {
            self.add_property(key, value);
        }
    }
}

/// A file or directory in HDFS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HdfsEntity {
    pub source_id: String,
    pub entity_type: EntityType,
    pub file_system_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(flatten)]
    pub metadata: CustomMetadata,
}

impl HdfsEntity {
    /// Build from a queried record; needs `sourceId` and `fileSystemPath`
    pub fn from_record(record: &EntityRecord) -> NavigatorResult<Self> {
        let source_id = required(&record.source_id, "HDFS", "sourceId")?;
        let file_system_path = required(&record.file_system_path, "HDFS", "fileSystemPath")?;
        let entity_type = match &record.entity_type {
            Some(EntityType::Directory) => EntityType::Directory,
            _ => EntityType::File,
        };

        Ok(Self {
            source_id,
            entity_type,
            file_system_path,
            name: record.original_name.clone(),
            description: None,
            namespace: None,
            metadata: CustomMetadata::default(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A Hive table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiveTable {
    pub source_id: String,
    pub entity_type: EntityType,
    pub database_name: String,
    pub table_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(flatten)]
    pub metadata: CustomMetadata,
}

impl HiveTable {
    /// Build from a queried record; needs `sourceId` and `originalName`
    ///
    /// The database is taken from `parentPath` (`/sales` -> `sales`).
    pub fn from_record(record: &EntityRecord) -> NavigatorResult<Self> {
        let source_id = required(&record.source_id, "Hive table", "sourceId")?;
        let table_name = required(&record.original_name, "Hive table", "originalName")?;
        let database_name = record
            .parent_path
            .as_deref()
            .map(|path| path.trim_matches('/'))
            .filter(|db| !db.is_empty())
            .unwrap_or(DEFAULT_HIVE_DATABASE)
            .to_string();

        Ok(Self {
            source_id,
            entity_type: EntityType::Table,
            database_name,
            table_name,
            namespace: None,
            metadata: CustomMetadata::default(),
        })
    }
}

/// Any entity the client knows how to write
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Hdfs(HdfsEntity),
    HiveTable(HiveTable),
}

impl Entity {
    pub fn source_id(&self) -> &str {
        match self {
            Entity::Hdfs(entity) => &entity.source_id,
            Entity::HiveTable(table) => &table.source_id,
        }
    }

    /// Human-readable identity for logs and reports
    pub fn display_name(&self) -> String {
        match self {
            Entity::Hdfs(entity) => entity.file_system_path.clone(),
            Entity::HiveTable(table) => format!("{}.{}", table.database_name, table.table_name),
        }
    }

    pub fn metadata(&self) -> &CustomMetadata {
        match self {
            Entity::Hdfs(entity) => &entity.metadata,
            Entity::HiveTable(table) => &table.metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut CustomMetadata {
        match self {
            Entity::Hdfs(entity) => &mut entity.metadata,
            Entity::HiveTable(table) => &mut table.metadata,
        }
    }

    pub fn has_namespace(&self) -> bool {
        match self {
            Entity::Hdfs(entity) => entity.namespace.is_some(),
            Entity::HiveTable(table) => table.namespace.is_some(),
        }
    }

    /// Set the namespace unless the entity already carries one
    pub fn default_namespace(&mut self, namespace: &str) {
        let slot = match self {
            Entity::Hdfs(entity) => &mut entity.namespace,
            Entity::HiveTable(table) => &mut table.namespace,
        };
        if slot.is_none() && !namespace.is_empty() {
            *slot = Some(namespace.to_string());
        }
    }
}

impl From<HdfsEntity> for Entity {
    fn from(entity: HdfsEntity) -> Self {
        Entity::Hdfs(entity)
    }
}

impl From<HiveTable> for Entity {
    fn from(table: HiveTable) -> Self {
        Entity::HiveTable(table)
    }
}

fn required(
    value: &Option<String>,
    entity: &'static str,
    field: &'static str,
) -> NavigatorResult<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(NavigatorError::MissingField { entity, field })
}
