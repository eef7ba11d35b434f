//! Typed views of the records returned by the Navigator query endpoints

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of system an entity was extracted from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceType {
    Hdfs,
    Hive,
    Other(String),
}

impl SourceType {
    pub fn as_str(&self) -> &str {
        match self {
            SourceType::Hdfs => "HDFS",
            SourceType::Hive => "HIVE",
            SourceType::Other(name) => name,
        }
    }
}

impl From<String> for SourceType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "HDFS" => SourceType::Hdfs,
            "HIVE" => SourceType::Hive,
            _ => SourceType::Other(value),
        }
    }
}

impl From<SourceType> for String {
    fn from(value: SourceType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of entity tracked by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    File,
    Directory,
    Database,
    Table,
    View,
    Field,
    Source,
    Other(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::File => "FILE",
            EntityType::Directory => "DIRECTORY",
            EntityType::Database => "DATABASE",
            EntityType::Table => "TABLE",
            EntityType::View => "VIEW",
            EntityType::Field => "FIELD",
            EntityType::Source => "SOURCE",
            EntityType::Other(name) => name,
        }
    }
}

impl From<String> for EntityType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "FILE" => EntityType::File,
            "DIRECTORY" => EntityType::Directory,
            "DATABASE" => EntityType::Database,
            "TABLE" => EntityType::Table,
            "VIEW" => EntityType::View,
            "FIELD" => EntityType::Field,
            "SOURCE" => EntityType::Source,
            _ => EntityType::Other(value),
        }
    }
}

impl From<EntityType> for String {
    fn from(value: EntityType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entity as returned by a query
///
/// Only the fields this client acts on are typed; everything else the
/// service sends is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    #[serde(default)]
    pub identity: Option<String>,

    #[serde(default)]
    pub source_type: Option<SourceType>,

    #[serde(rename = "type", default)]
    pub entity_type: Option<EntityType>,

    #[serde(default)]
    pub source_id: Option<String>,

    #[serde(default)]
    pub original_name: Option<String>,

    #[serde(default)]
    pub file_system_path: Option<String>,

    #[serde(default)]
    pub parent_path: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntityRecord {
    /// Look up an untyped field the service returned
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// A metadata source registered with the service (one per cluster service)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Unique source id; entities reference it as `sourceId`
    pub identity: String,

    #[serde(default)]
    pub original_name: Option<String>,

    pub source_type: SourceType,

    #[serde(default)]
    pub source_url: Option<String>,

    /// Number of completed extraction runs for this source
    #[serde(default)]
    pub source_extract_iteration: u64,
}
