//! Resumption markers for incremental extraction
//!
//! A marker records how many extraction runs each source had completed when a
//! query was issued. Callers treat it as an opaque string; the extractor uses
//! it to restrict a later query to entities touched by newer runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{NavigatorError, NavigatorResult};
use crate::model::Source;

/// Opaque cursor into the service's change history
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker(String);

/// Source id -> completed extraction iterations
pub(crate) type Iterations = BTreeMap<String, u64>;

impl Marker {
    /// Wrap a marker string, e.g. one read back from a marker file
    pub fn new(marker: impl Into<String>) -> Self {
        Self(marker.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Marker for the current state of the given sources
    pub(crate) fn for_sources(sources: &[Source]) -> NavigatorResult<Self> {
        let iterations: Iterations = sources
            .iter()
            .map(|source| (source.identity.clone(), source.source_extract_iteration))
            .collect();
        Ok(Self(serde_json::to_string(&iterations)?))
    }

    pub(crate) fn iterations(&self) -> NavigatorResult<Iterations> {
        serde_json::from_str(&self.0).map_err(|e| NavigatorError::Query {
            status: 0,
            message: format!("Unreadable marker '{}': {}", self.0, e),
        })
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Marker {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Id the service assigns to the `iteration`-th extraction run of a source
pub fn extractor_run_id(source_id: &str, iteration: u64) -> String {
    format!("{}##{}", source_id, iteration)
}

/// Most run ids put in one `extractorRunId` clause
///
/// Search backends cap boolean clauses per query (Solr defaults to 1024).
pub const MAX_RUN_IDS_PER_QUERY: usize = 800;

/// Query clauses matching entities touched by runs after `since` up to `current`
///
/// Each clause lists at most `max_run_ids` run ids. Returns an empty list
/// when no source has advanced, i.e. nothing can have changed.
pub(crate) fn changed_since_clauses(
    since: &Iterations,
    current: &Iterations,
    max_run_ids: usize,
) -> Vec<String> {
    let run_ids: Vec<String> = current
        .iter()
        .flat_map(|(source_id, &now)| {
            let start = since.get(source_id).copied().unwrap_or(0);
            (start.saturating_add(1)..=now)
                .map(move |iteration| format!("\"{}\"", extractor_run_id(source_id, iteration)))
        })
        .collect();

    run_ids
        .chunks(max_run_ids.max(1))
        .map(|chunk| format!("extractorRunId:({})", chunk.join(" OR ")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceType;

    fn source(identity: &str, iteration: u64) -> Source {
        Source {
            identity: identity.to_string(),
            original_name: None,
            source_type: SourceType::Hdfs,
            source_url: None,
            source_extract_iteration: iteration,
        }
    }

    #[test]
    fn test_marker_round_trips_iterations() {
        let marker = Marker::for_sources(&[source("a", 3), source("b", 7)]).unwrap();
        let iterations = marker.iterations().unwrap();
        assert_eq!(iterations.get("a"), Some(&3));
        assert_eq!(iterations.get("b"), Some(&7));

        let reread: Marker = marker.as_str().parse().unwrap();
        assert_eq!(reread, marker);
    }

    #[test]
    fn test_garbage_marker_is_query_error() {
        let err = Marker::new("not-json").iterations().unwrap_err();
        assert!(matches!(err, NavigatorError::Query { status: 0, .. }));
    }

    #[test]
    fn test_no_clause_when_nothing_advanced() {
        let current: Iterations = [("a".to_string(), 3)].into_iter().collect();
        assert!(changed_since_clauses(&current, &current, MAX_RUN_IDS_PER_QUERY).is_empty());
    }

    #[test]
    fn test_clause_lists_newer_runs_only() {
        let since: Iterations = [("a".to_string(), 3), ("b".to_string(), 5)].into_iter().collect();
        let current: Iterations = [("a".to_string(), 5), ("b".to_string(), 5), ("c".to_string(), 1)]
            .into_iter()
            .collect();

        assert_eq!(
            changed_since_clauses(&since, &current, MAX_RUN_IDS_PER_QUERY),
            vec!["extractorRunId:(\"a##4\" OR \"a##5\" OR \"c##1\")".to_string()]
        );
    }

    #[test]
    fn test_long_run_lists_are_split() {
        let since = Iterations::new();
        let current: Iterations = [("a".to_string(), 5)].into_iter().collect();

        assert_eq!(
            changed_since_clauses(&since, &current, 2),
            vec![
                "extractorRunId:(\"a##1\" OR \"a##2\")".to_string(),
                "extractorRunId:(\"a##3\" OR \"a##4\")".to_string(),
                "extractorRunId:(\"a##5\")".to_string(),
            ]
        );
    }

    #[test]
    fn test_source_missing_from_marker_stays_under_clause_cap() {
        let since = Iterations::new();
        let current: Iterations = [("a".to_string(), 3000)].into_iter().collect();

        let clauses = changed_since_clauses(&since, &current, MAX_RUN_IDS_PER_QUERY);
        assert_eq!(clauses.len(), 4);
        for clause in &clauses {
            assert!(clause.matches("##").count() <= MAX_RUN_IDS_PER_QUERY);
        }
        assert!(clauses[3].ends_with("\"a##3000\")"));
    }
}
