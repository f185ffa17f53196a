//! Error types for the grading core
//!
//! `GradeError` is internal: the orchestrator maps every variant to a typed
//! [`crate::GradeResult`] before anything crosses its boundary. Only the
//! collaborator seams (`Identity`, `BoardStore`) surface real `Result`s to
//! the caller.

use gradeboard_oracle::OracleError;

/// Internal grading failure taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    /// Admission rejected the request
    #[error("quota exceeded")]
    QuotaExceeded {
        /// Window reset, epoch milliseconds
        reset_at: i64,
    },

    /// The snapshot produced zero nodes
    #[error("nothing to evaluate")]
    EmptyDiagram,

    /// The oracle call or its validation failed
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),
}

impl GradeError {
    /// Whether the condition is expected user behavior rather than a fault.
    #[inline]
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. } | Self::EmptyDiagram)
    }
}

/// Construction-time configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The oracle cannot be reached without credentials
    #[error("oracle credentials not configured (set GEMINI_API_KEY)")]
    MissingOracleCredentials,
}

/// Authentication collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authenticated session
    #[error("not authenticated")]
    Unauthenticated,
}

/// Board-store collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum BoardStoreError {
    /// Absent, or owned by someone else; the two are deliberately
    /// indistinguishable to the caller.
    #[error("board not found")]
    NotFound,

    /// Anything the storage backend could not do
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Failures reaching the diagram before grading could start.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Identity could not be resolved
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The board could not be fetched
    #[error("board access failed: {0}")]
    Board(#[from] BoardStoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_conditions_are_flagged() {
        assert!(GradeError::QuotaExceeded { reset_at: 0 }.is_expected());
        assert!(GradeError::EmptyDiagram.is_expected());
        assert!(!GradeError::Oracle(OracleError::MissingContent).is_expected());
    }

    #[test]
    fn access_error_wraps_collaborator_failures() {
        let error: AccessError = AuthError::Unauthenticated.into();
        assert!(error.to_string().contains("authentication failed"));

        let error: AccessError = BoardStoreError::NotFound.into();
        assert!(error.to_string().contains("board not found"));
    }
}
