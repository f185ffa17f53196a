//! Core types
//!
//! The caller-facing result union, user identity, and orchestrator
//! configuration.

use gradeboard_admission::RateLimitPolicy;
use gradeboard_oracle::GradeVerdict;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Opaque user identity, supplied by the external auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an externally issued identity.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identity string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one grading request.
///
/// Recoverable conditions are values, not errors: quota exhaustion, an empty
/// board and oracle trouble all arrive here as [`GradeResult::Rejected`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum GradeResult {
    /// The diagram was evaluated.
    #[serde(rename_all = "camelCase")]
    Graded {
        /// The validated verdict
        result: GradeVerdict,
        /// Quota units left, captured at admission time
        remaining: u32,
    },
    /// The request was turned away before a verdict existed.
    #[serde(rename_all = "camelCase")]
    Rejected {
        /// User-facing explanation
        error: String,
        /// Window reset, epoch milliseconds (quota rejections only)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reset_at: Option<i64>,
    },
}

impl GradeResult {
    /// Whether a verdict was produced.
    #[inline]
    #[must_use]
    pub fn is_graded(&self) -> bool {
        matches!(self, Self::Graded { .. })
    }

    /// The verdict, when one was produced.
    #[must_use]
    pub fn verdict(&self) -> Option<&GradeVerdict> {
        match self {
            Self::Graded { result, .. } => Some(result),
            Self::Rejected { .. } => None,
        }
    }
}

/// Orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraderConfig {
    /// Admitted grading requests per window
    pub quota: u32,
    /// Rolling admission window
    pub window: Duration,
    /// Oracle model name
    pub model: String,
}

impl GraderConfig {
    /// Default configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the admission quota.
    #[inline]
    #[must_use]
    pub fn with_quota(mut self, quota: u32) -> Self {
        self.quota = quota;
        self
    }

    /// Override the admission window.
    #[inline]
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Override the oracle model.
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The admission policy this configuration implies.
    #[inline]
    #[must_use]
    pub fn policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(self.quota, self.window)
    }
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            quota: 5,
            window: Duration::from_secs(3600),
            model: "gemini-1.5-pro".to_string(),
        }
    }
}
