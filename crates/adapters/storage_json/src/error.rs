//! JSON store error type.

use std::path::PathBuf;

use planner_domain::error::PlannerError;

/// Errors originating from the JSON file store.
#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("unable to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to serialize the schedule")]
    Serialize(#[source] serde_json::Error),
}

impl JsonStoreError {
    /// Convert into the domain-level error.
    #[must_use]
    pub fn into_domain(self) -> PlannerError {
        PlannerError::Storage(Box::new(self))
    }
}

impl From<JsonStoreError> for PlannerError {
    fn from(err: JsonStoreError) -> Self {
        err.into_domain()
    }
}
