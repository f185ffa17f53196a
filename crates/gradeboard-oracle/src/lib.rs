//! Gradeboard Oracle - structured-reasoning boundary
//!
//! The single non-deterministic external dependency of the pipeline:
//! - [`GradeVerdict`]: the typed verdict, with schema validation before any
//!   oracle output is trusted
//! - [`prompt::build_grading_prompt`]: the deterministic prompt that is the
//!   only channel through which a diagram reaches the oracle
//! - [`Oracle`]: the outbound seam, with a Gemini structured-output client
//!   as the reference backend

pub mod client;
pub mod error;
pub mod prompt;
pub mod verdict;

pub use client::{GeminiOracle, Oracle};
pub use error::OracleError;
pub use prompt::build_grading_prompt;
pub use verdict::GradeVerdict;
