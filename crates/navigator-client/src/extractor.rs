//! Filtered, optionally incremental, metadata extraction

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument};

use crate::client::NavApiClient;
use crate::error::{NavigatorError, NavigatorResult};
use crate::marker::{changed_since_clauses, Marker, MAX_RUN_IDS_PER_QUERY};
use crate::model::EntityRecord;

/// Cursor value requesting the first page
const FIRST_PAGE: &str = "*";

/// Lazy, single-pass sequence of query results
pub type EntityStream = BoxStream<'static, NavigatorResult<EntityRecord>>;

/// Entities matched by one extraction plus the marker to resume from
pub struct MetadataResultSet {
    marker: Marker,
    entities: EntityStream,
}

impl MetadataResultSet {
    pub fn new(entities: EntityStream, marker: Marker) -> Self {
        Self { marker, entities }
    }

    /// A result set that yields nothing
    pub fn empty(marker: Marker) -> Self {
        Self::new(stream::empty().boxed(), marker)
    }

    /// Marker describing the service state when the query ran
    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Consume the result set, keeping only the entities
    pub fn into_entities(self) -> EntityStream {
        self.entities
    }

    pub fn into_parts(self) -> (EntityStream, Marker) {
        (self.entities, self.marker)
    }
}

impl std::fmt::Debug for MetadataResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataResultSet")
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}

/// Runs entity queries, scoping them to changes after a marker when given one
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    client: NavApiClient,
    batch_size: usize,
}

impl MetadataExtractor {
    pub fn new(client: NavApiClient) -> Self {
        let batch_size = client.config().extractor_batch_size.max(1);
        Self { client, batch_size }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Entities matching `query`, limited to changes after `marker` if present
    ///
    /// The filter is passed to the service as written. The returned marker
    /// reflects the service state at call time; re-running the same query
    /// with it yields nothing until another extraction run completes.
    #[instrument(skip(self, marker), fields(incremental = marker.is_some()))]
    pub async fn extract_metadata(
        &self,
        marker: Option<&Marker>,
        query: &str,
    ) -> NavigatorResult<MetadataResultSet> {
        let sources = self.client.sources().await?;
        let next_marker = Marker::for_sources(&sources)?;

        let scoped_queries = match marker {
            None => vec![query.to_string()],
            Some(marker) => {
                let since = marker.iterations()?;
                let current = next_marker.iterations()?;
                changed_since_clauses(&since, &current, MAX_RUN_IDS_PER_QUERY)
                    .into_iter()
                    .map(|clause| format!("({}) AND {}", query, clause))
                    .collect()
            }
        };

        if scoped_queries.is_empty() {
            info!("No extraction runs since marker, skipping query");
            return Ok(MetadataResultSet::empty(next_marker));
        }

        debug!(queries = scoped_queries.len(), "Extracting metadata");
        let client = self.client.clone();
        let limit = self.batch_size;
        let entities = stream::iter(scoped_queries)
            .map(move |scoped_query| paged_entities(client.clone(), scoped_query, limit))
            .flatten()
            .boxed();
        Ok(MetadataResultSet::new(entities, next_marker))
    }
}

/// Stream every page of `query`, fetching the next page only when the
/// previous one is exhausted
///
/// Paging ends on an empty page or when the service hands back the cursor it
/// was given. Short pages do not end it: the service may cap the page size.
fn paged_entities(client: NavApiClient, query: String, limit: usize) -> EntityStream {
    stream::try_unfold(Some(FIRST_PAGE.to_string()), move |cursor| {
        let client = client.clone();
        let query = query.clone();
        async move {
            let Some(cursor) = cursor else {
                return Ok(None);
            };

            let page = client.page(&query, limit, &cursor).await?;
            if page.results.is_empty() {
                return Ok(None);
            }

            let next = page.cursor_mark.filter(|next| *next != cursor);
            let records = stream::iter(page.results.into_iter().map(Ok::<_, NavigatorError>));
            Ok::<_, NavigatorError>(Some((records, next)))
        }
    })
    .try_flatten()
    .boxed()
}
