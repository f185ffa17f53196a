//! Oracle failure taxonomy
//!
//! Every variant is an internal detail: the orchestrator logs it in full and
//! surfaces only a generic retry message to the caller.

/// Failures at the oracle boundary.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Request never completed
    #[error("transport failure: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("service returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        message: String,
    },

    /// Service answered without any generated content
    #[error("response carried no content")]
    MissingContent,

    /// Generated content was not parseable JSON
    #[error("response payload was not valid JSON: {0}")]
    InvalidPayload(String),

    /// Generated content did not conform to the verdict schema
    #[error("response violated the verdict schema: {0}")]
    SchemaViolation(String),
}
