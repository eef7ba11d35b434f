//! Persisting markers between runs: one marker on the first line of a file

use std::path::Path;

use navigator_client::{Marker, NavigatorError, NavigatorResult};
use tokio::fs;
use tracing::{debug, info};

/// Marker stored on the first line of `path`; `None` when that line is blank
pub async fn read_marker(path: impl AsRef<Path>) -> NavigatorResult<Option<Marker>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).await.map_err(|e| {
        NavigatorError::Argument(format!("Cannot read marker file {}: {}", path.display(), e))
    })?;

    let marker = contents
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Marker::new);

    debug!(path = %path.display(), found = marker.is_some(), "Read marker file");
    Ok(marker)
}

/// Replace the contents of `path` with `marker`
pub async fn write_marker(path: impl AsRef<Path>, marker: &Marker) -> NavigatorResult<()> {
    let path = path.as_ref();
    fs::write(path, format!("{}\n", marker)).await?;
    info!(path = %path.display(), "Saved marker for next run");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_marker_survives_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marker.txt");
        let marker = Marker::new(r#"{"hdfs-src":12}"#);

        write_marker(&path, &marker).await.unwrap();
        assert_eq!(read_marker(&path).await.unwrap(), Some(marker));
    }

    #[tokio::test]
    async fn test_only_first_line_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marker.txt");
        std::fs::write(&path, "  first  \nsecond\n").unwrap();

        assert_eq!(read_marker(&path).await.unwrap(), Some(Marker::new("first")));
    }

    #[tokio::test]
    async fn test_blank_file_means_no_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marker.txt");
        std::fs::write(&path, "\n").unwrap();

        assert_eq!(read_marker(&path).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_argument_error() {
        let err = read_marker("/nonexistent/marker.txt").await.unwrap_err();
        assert!(matches!(err, NavigatorError::Argument(_)));
    }
}
