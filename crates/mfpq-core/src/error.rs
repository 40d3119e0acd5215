//! Error taxonomy for report execution.
//!
//! Reports fail as a whole: the first error on any record, request, or
//! response aborts the computation with no partial output and no retries.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Everything that can go wrong while computing a report.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Report name not known to the dispatcher.
    #[error("no report named '{0}'")]
    UnknownReport(String),

    /// A record lacks a field the report requires.
    #[error("record is missing required field '{0}'")]
    MissingField(&'static str),

    /// A required field is present but its value is unusable.
    #[error("field '{field}' has unusable value {value}")]
    Parse {
        field: &'static str,
        value: String,
    },

    /// Transport or HTTP-status failure talking to the index.
    #[error("index request failed: {0}")]
    Http(Box<ureq::Error>),

    /// Response body was not valid JSON.
    #[error("invalid JSON from the index: {0}")]
    Json(#[from] serde_json::Error),

    /// Response decoded, but did not have the expected shape.
    #[error("unexpected response from the index: {0}")]
    UnexpectedResponse(String),
}

// thiserror cannot #[from] into a boxed variant.
impl From<ureq::Error> for QueryError {
    fn from(err: ureq::Error) -> Self {
        QueryError::Http(Box::new(err))
    }
}
