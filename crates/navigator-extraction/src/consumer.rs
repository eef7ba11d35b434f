//! Minimal consumer of query results: look at the first record only

use futures::TryStreamExt;
use navigator_client::{EntityRecord, EntityStream, NavigatorResult};
use tracing::debug;

use crate::report::{describe_record, Reporter, NO_ELEMENTS_FOUND};

/// Report the first record of `entities`, or that there was none
///
/// Only the first page is ever requested; the rest of the stream is dropped.
pub async fn consume_first(
    mut entities: EntityStream,
    reporter: &mut dyn Reporter,
) -> NavigatorResult<Option<EntityRecord>> {
    let first = entities.try_next().await?;
    match &first {
        Some(record) => reporter.report(&describe_record(record)),
        None => {
            debug!("Query returned no entities");
            reporter.report(NO_ELEMENTS_FOUND);
        }
    }
    Ok(first)
}
