//! Navigator client
//!
//! Client for a Cloudera Navigator style metadata catalog: filtered and
//! incremental entity queries, and tag/property updates on HDFS and Hive
//! entities.

#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod extractor;
pub mod marker;
pub mod model;
pub mod plugin;
pub mod writer;

pub use client::NavApiClient;
pub use config::NavigatorConfig;
pub use entity::{CustomMetadata, Entity, HdfsEntity, HiveTable};
pub use error::{NavigatorError, NavigatorResult};
pub use extractor::{EntityStream, MetadataExtractor, MetadataResultSet};
pub use marker::Marker;
pub use model::{EntityRecord, EntityType, Source, SourceType};
pub use plugin::{MetadataService, NavigatorPlugin};
pub use writer::WriteResult;
