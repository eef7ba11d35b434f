//! Full runs against a mocked Navigator service

use std::io::Write;

use navigator_client::{NavigatorError, NavigatorPlugin};
use navigator_extraction::workflow::HDFS_SAMPLE_FILE;
use navigator_extraction::{read_marker, run_hdfs, run_hive, write_marker, MemoryReporter, NO_ELEMENTS_FOUND};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_sources(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v9/entities"))
        .and(query_param("query", "type:SOURCE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"identity": "hdfs-src", "sourceType": "HDFS", "sourceExtractIteration": 7},
            {"identity": "hive-src", "sourceType": "HIVE", "sourceExtractIteration": 3}
        ])))
        .mount(server)
        .await;
}

fn plugin_for(server: &MockServer) -> (tempfile::NamedTempFile, NavigatorPlugin) {
    let mut file = tempfile::Builder::new().suffix(".conf").tempfile().unwrap();
    writeln!(file, "navigator_url={}", server.uri()).unwrap();
    writeln!(file, "username=admin").unwrap();
    writeln!(file, "password=admin").unwrap();
    let plugin = NavigatorPlugin::from_config_file(file.path()).unwrap();
    (file, plugin)
}

#[tokio::test]
async fn test_hive_run_and_incremental_rerun() {
    let server = MockServer::start().await;
    mount_sources(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v9/entities/paging"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "identity": "t1",
                "sourceType": "HIVE",
                "type": "TABLE",
                "sourceId": "hive-src",
                "originalName": "cart_items",
                "parentPath": "/default"
            }],
            "cursorMark": "next"
        })))
        // Five queries on the first run, none on the rerun
        .expect(5)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v9/entities/"))
        .and(body_partial_json(json!({
            "sourceId": "hive-src",
            "databaseName": "default",
            "tableName": "cart_items",
            "namespace": "partner",
            "tags": ["sampletabletag1"],
            "properties": {"creator": "test", "sampleKeyProp": "sampleValueProp"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"identity": "t1"})))
        .expect(1)
        .mount(&server)
        .await;

    let (_config_file, plugin) = plugin_for(&server);
    let marker_dir = tempfile::tempdir().unwrap();
    let marker_path = marker_dir.path().join("hive.marker");

    let mut reporter = MemoryReporter::new();
    let outcome = run_hive(&plugin, None, &mut reporter).await.unwrap();
    write_marker(&marker_path, &outcome.marker).await.unwrap();

    assert_eq!(outcome.update.unwrap().status, Some(201));
    assert!(reporter.contains("successfully updated table"));
    assert_eq!(reporter.lines().last().map(String::as_str), Some(NO_ELEMENTS_FOUND));

    let marker = read_marker(&marker_path).await.unwrap();
    assert_eq!(marker.as_ref(), Some(&outcome.marker));

    let mut reporter = MemoryReporter::new();
    let rerun = run_hive(&plugin, marker.as_ref(), &mut reporter).await.unwrap();
    assert!(rerun.update.is_none());
    assert_eq!(rerun.marker, outcome.marker);
    assert!(!reporter.contains("originalName:"));
}

#[tokio::test]
async fn test_hdfs_run_fails_fast_on_rejected_write() {
    let server = MockServer::start().await;
    mount_sources(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v9/entities/paging"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "sourceType": "HDFS",
                "type": "FILE",
                "sourceId": "hdfs-src",
                "originalName": "sample_07",
                "fileSystemPath": "/user/admin/sample_07"
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v9/entities/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Unknown custom property"))
        .expect(1)
        .mount(&server)
        .await;

    let (_config_file, plugin) = plugin_for(&server);
    let mut reporter = MemoryReporter::new();

    let err = run_hdfs(&plugin, None, &mut reporter).await.unwrap_err();

    match err {
        NavigatorError::Write { details } => assert!(details.contains("Unknown custom property")),
        other => panic!("expected a write error, got {:?}", other),
    }
    assert!(!reporter.contains("successfully updated"));
    assert!(reporter.contains("originalName: sample_07"));
}

#[tokio::test]
async fn test_hdfs_sample_query_is_sent_unchanged_without_marker() {
    let server = MockServer::start().await;
    mount_sources(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v9/entities/paging"))
        .and(body_partial_json(json!({"query": HDFS_SAMPLE_FILE, "cursorMark": "*"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v9/entities/paging"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let (_config_file, plugin) = plugin_for(&server);
    let mut reporter = MemoryReporter::new();

    let outcome = run_hdfs(&plugin, None, &mut reporter).await.unwrap();

    assert!(outcome.update.is_none());
    assert!(reporter.lines().iter().all(|line| line == NO_ELEMENTS_FOUND));
}
