//! In-memory catalog used by the workflow tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use navigator_client::{
    Entity, EntityRecord, EntityType, Marker, MetadataResultSet, MetadataService, NavigatorError,
    NavigatorResult, Source, SourceType, WriteResult,
};

/// Fake catalog: canned results per query, and a single extraction counter
///
/// A marker is the counter value at query time. Re-querying with the current
/// counter returns nothing, like the real service when no run completed.
pub struct FakeCatalog {
    results: Mutex<HashMap<String, Vec<EntityRecord>>>,
    iteration: Mutex<u64>,
    queries: Mutex<Vec<String>>,
    writes: Mutex<Vec<Entity>>,
    reject_writes: bool,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(HashMap::new()),
            iteration: Mutex::new(1),
            queries: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
            reject_writes: false,
        }
    }

    /// Every write comes back with a service-side error
    pub fn rejecting_writes() -> Self {
        Self {
            reject_writes: true,
            ..Self::new()
        }
    }

    pub fn add_results(&self, query: &str, records: Vec<EntityRecord>) {
        self.results.lock().unwrap().insert(query.to_string(), records);
    }

    /// Simulate a completed extraction run
    pub fn advance(&self) {
        *self.iteration.lock().unwrap() += 1;
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Entity> {
        self.writes.lock().unwrap().clone()
    }

    fn current_marker(&self) -> Marker {
        Marker::new(self.iteration.lock().unwrap().to_string())
    }
}

#[async_trait]
impl MetadataService for FakeCatalog {
    async fn extract_metadata(
        &self,
        marker: Option<&Marker>,
        query: &str,
    ) -> NavigatorResult<MetadataResultSet> {
        self.queries.lock().unwrap().push(query.to_string());
        let current = self.current_marker();
        if marker == Some(&current) {
            return Ok(MetadataResultSet::empty(current));
        }

        let records = self
            .results
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default();
        let entities = stream::iter(records.into_iter().map(Ok::<_, NavigatorError>)).boxed();
        Ok(MetadataResultSet::new(entities, current))
    }

    async fn only_source(&self, source_type: SourceType) -> NavigatorResult<Source> {
        match source_type {
            SourceType::Hdfs => Ok(Source {
                identity: "hdfs-src".to_string(),
                original_name: Some("HDFS-1".to_string()),
                source_type,
                source_url: None,
                source_extract_iteration: *self.iteration.lock().unwrap(),
            }),
            other => Err(NavigatorError::SourceLookup(format!("No {} source registered", other))),
        }
    }

    async fn write(&self, entity: &Entity) -> NavigatorResult<WriteResult> {
        if self.reject_writes {
            return Ok(WriteResult::failed(400, "Invalid entity"));
        }
        self.writes.lock().unwrap().push(entity.clone());
        Ok(WriteResult::success(200))
    }
}

pub fn hdfs_file(name: &str, path: &str) -> EntityRecord {
    EntityRecord {
        identity: Some(format!("id-{}", name)),
        source_type: Some(SourceType::Hdfs),
        entity_type: Some(EntityType::File),
        source_id: Some("hdfs-src".to_string()),
        original_name: Some(name.to_string()),
        file_system_path: Some(path.to_string()),
        ..Default::default()
    }
}

pub fn hdfs_directory(path: &str) -> EntityRecord {
    EntityRecord {
        entity_type: Some(EntityType::Directory),
        ..hdfs_file(path.rsplit('/').next().unwrap_or(path), path)
    }
}

pub fn hive_record(entity_type: EntityType, name: &str, parent_path: &str) -> EntityRecord {
    EntityRecord {
        identity: Some(format!("id-{}", name)),
        source_type: Some(SourceType::Hive),
        entity_type: Some(entity_type),
        source_id: Some("hive-src".to_string()),
        original_name: Some(name.to_string()),
        parent_path: Some(parent_path.to_string()),
        ..Default::default()
    }
}
