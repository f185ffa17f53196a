//! Gradeboard Core - grading orchestration
//!
//! Composes the pipeline behind one call:
//! - Admission check against the per-user quota (fail-open)
//! - Snapshot-to-graph extraction
//! - Oracle invocation with schema-validated output
//! - A typed, infallible result for the caller
//!
//! # Example
//!
//! ```rust,ignore
//! use gradeboard_core::{Grader, GraderConfig, UserId};
//!
//! # async fn example(snapshot: serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
//! let grader = Grader::from_env(GraderConfig::default())?;
//! let user = UserId::from("auth0|abc123");
//!
//! let result = grader.grade(&user, &snapshot, "Design a URL shortener").await;
//! if let Some(verdict) = result.verdict() {
//!     println!("score: {}/10", verdict.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod collaborators;
pub mod error;
pub mod grader;
pub mod types;

pub use collaborators::{Board, BoardStore, BoardSummary, Identity};
pub use error::{AccessError, AuthError, BoardStoreError, ConfigError, GradeError};
pub use grader::Grader;
pub use types::{GradeResult, GraderConfig, UserId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the grading core
    pub use crate::{GradeResult, Grader, GraderConfig, UserId};
    pub use gradeboard_admission::{RateLimitPolicy, RateLimiter};
    pub use gradeboard_oracle::{GradeVerdict, Oracle};
    pub use gradeboard_snapshot::{extract, LogicalGraph};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
