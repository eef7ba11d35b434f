//! Outcome of submitting an entity to the write endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NavigatorError, NavigatorResult};

/// Result of one write call
///
/// A write that reached the service always produces a `WriteResult`; whether
/// the service accepted it is reported through [`WriteResult::has_errors`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResult {
    /// HTTP status the service answered with
    #[serde(default)]
    pub status: Option<u16>,

    /// Validation or persistence errors reported by the service
    #[serde(default)]
    pub errors: Vec<String>,
}

impl WriteResult {
    pub fn success(status: u16) -> Self {
        Self {
            status: Some(status),
            errors: Vec::new(),
        }
    }

    pub fn failed(status: u16, error: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            errors: vec![error.into()],
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Turn a result with errors into [`NavigatorError::Write`]
    pub fn into_result(self) -> NavigatorResult<Self> {
        if self.has_errors() {
            Err(NavigatorError::Write {
                details: self.to_string(),
            })
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for WriteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(status) = self.status {
            parts.push(format!("status {}", status));
        }
        if self.has_errors() {
            parts.push(format!("errors: [{}]", self.errors.join("; ")));
        }
        f.write_str(&parts.join(", "))
    }
}
