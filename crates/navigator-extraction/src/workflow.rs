//! The HDFS and Hive extraction runs
//!
//! Each run is a fixed sequence of queries and one tag update, executed one
//! call at a time. The first error ends the run.

use navigator_client::{Marker, MetadataService, NavigatorResult, SourceType, WriteResult};
use tracing::info;

use crate::consumer::consume_first;
use crate::report::Reporter;
use crate::updater::{EntityUpdater, TagUpdate, TargetKind};

pub const HDFS_ALL: &str = "sourceType:HDFS";
pub const HDFS_SAMPLE_FILE: &str = "sourceType:HDFS AND type:FILE AND originalName:sample_07";
pub const HDFS_DIRECTORIES: &str = "sourceType:HDFS AND type:DIRECTORY";

pub const HIVE_DATABASES: &str = "sourceType:HIVE AND type:DATABASE";
pub const HIVE_TABLES: &str = "sourceType:HIVE AND type:TABLE";
pub const HIVE_VIEWS: &str = "sourceType:HIVE AND type:VIEW";
pub const HIVE_SAMPLE_TABLE: &str = "sourceType:HIVE AND type:TABLE AND originalName:cart_items";

/// Column searched for by the Hive run
pub const HIVE_SAMPLE_COLUMN: &str = "salary";

/// Query for Hive columns with the given name
pub fn hive_column_query(column: &str) -> String {
    format!("sourceType:HIVE AND type:FIELD AND originalName:{}", column)
}

/// Query for every entity of one source
pub fn hdfs_source_query(source_id: &str) -> String {
    format!("sourceType:HDFS AND sourceId:{}", source_id)
}

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Marker to hand to the next run
    pub marker: Marker,
    /// Result of the tag update, if a target was found
    pub update: Option<WriteResult>,
}

/// Run one query and report its first result, returning the query's marker
async fn query_and_report(
    service: &dyn MetadataService,
    marker: Option<&Marker>,
    query: &str,
    reporter: &mut dyn Reporter,
) -> NavigatorResult<Marker> {
    let (entities, next_marker) = service.extract_metadata(marker, query).await?.into_parts();
    consume_first(entities, reporter).await?;
    Ok(next_marker)
}

/// Queries over HDFS entities; returns the marker of the all-HDFS query
pub async fn hdfs_queries(
    service: &dyn MetadataService,
    marker: Option<&Marker>,
    reporter: &mut dyn Reporter,
) -> NavigatorResult<Marker> {
    let next_marker = query_and_report(service, marker, HDFS_ALL, reporter).await?;

    let source = service.only_source(SourceType::Hdfs).await?;
    query_and_report(service, marker, &hdfs_source_query(&source.identity), reporter).await?;

    query_and_report(service, marker, HDFS_SAMPLE_FILE, reporter).await?;
    query_and_report(service, marker, HDFS_DIRECTORIES, reporter).await?;

    Ok(next_marker)
}

/// Tag the `sample_07` file and attach a creator property
pub async fn hdfs_tag_sample(
    service: &dyn MetadataService,
    marker: Option<&Marker>,
    reporter: &mut dyn Reporter,
) -> NavigatorResult<Option<WriteResult>> {
    let update = TagUpdate::new()
        .description("Navigator Custom Properties")
        .tag("tag1")
        .tag("tag2")
        .property("creator", "partnerCreated");

    let result = EntityUpdater::new(service)
        .find_and_update(marker, HDFS_SAMPLE_FILE, TargetKind::Hdfs, &update, reporter)
        .await?;
    if result.is_some() {
        reporter.report("successfully updated sample hdfs file");
    }
    Ok(result)
}

/// Full HDFS run: queries first, then the tag update
pub async fn run_hdfs(
    service: &dyn MetadataService,
    marker: Option<&Marker>,
    reporter: &mut dyn Reporter,
) -> NavigatorResult<RunOutcome> {
    info!(incremental = marker.is_some(), "Starting HDFS extraction");
    let next_marker = hdfs_queries(service, marker, reporter).await?;
    let update = hdfs_tag_sample(service, marker, reporter).await?;
    Ok(RunOutcome {
        marker: next_marker,
        update,
    })
}

/// Queries over Hive entities; returns the marker of the table query
///
/// Ends by repeating the table query with that marker, which must come back
/// empty since nothing changed in between.
pub async fn hive_queries(
    service: &dyn MetadataService,
    marker: Option<&Marker>,
    column: &str,
    reporter: &mut dyn Reporter,
) -> NavigatorResult<Marker> {
    query_and_report(service, marker, HIVE_DATABASES, reporter).await?;
    let table_marker = query_and_report(service, marker, HIVE_TABLES, reporter).await?;
    query_and_report(service, marker, HIVE_VIEWS, reporter).await?;
    query_and_report(service, marker, &hive_column_query(column), reporter).await?;

    reporter.report("query the data again - should return no results");
    query_and_report(service, Some(&table_marker), HIVE_TABLES, reporter).await?;

    Ok(table_marker)
}

/// Tag the `cart_items` table and attach sample properties
pub async fn hive_tag_sample(
    service: &dyn MetadataService,
    marker: Option<&Marker>,
    reporter: &mut dyn Reporter,
) -> NavigatorResult<Option<WriteResult>> {
    let update = TagUpdate::new()
        .tag("sampletabletag1")
        .property("sampleKeyProp", "sampleValueProp")
        .property("creator", "test");

    let result = EntityUpdater::new(service)
        .find_and_update(marker, HIVE_SAMPLE_TABLE, TargetKind::HiveTable, &update, reporter)
        .await?;
    if result.is_some() {
        reporter.report("successfully updated table");
    }
    Ok(result)
}

/// Full Hive run: the tag update first, then the queries
pub async fn run_hive(
    service: &dyn MetadataService,
    marker: Option<&Marker>,
    reporter: &mut dyn Reporter,
) -> NavigatorResult<RunOutcome> {
    info!(incremental = marker.is_some(), "Starting Hive extraction");
    let update = hive_tag_sample(service, marker, reporter).await?;
    let next_marker = hive_queries(service, marker, HIVE_SAMPLE_COLUMN, reporter).await?;
    Ok(RunOutcome {
        marker: next_marker,
        update,
    })
}
