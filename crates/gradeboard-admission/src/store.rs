//! Counter-store seam
//!
//! The backend owns the sliding window: one `limit` call both records the
//! event and reports whether it fits the quota. Atomicity of that
//! check-and-increment is the backend's contract, which is what keeps
//! concurrent checks for the same user from under- or over-counting.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of one atomic check-and-increment against the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    /// Whether the event fits the quota
    pub allowed: bool,
    /// Quota units left in the window
    pub remaining: u32,
    /// When the window resets, epoch milliseconds
    pub reset_at: i64,
}

/// Counter backend failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Request never completed
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with an error payload
    #[error("backend rejected command: {0}")]
    Backend(String),

    /// Backend answered with something unparseable
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// External atomic counter service, keyed by user identity.
#[async_trait]
pub trait CounterStore: Send + Sync + std::fmt::Debug {
    /// Record one event for `key` and report the resulting window state.
    ///
    /// Every call consumes exactly one window increment, admitted or not.
    async fn limit(&self, key: &str) -> Result<WindowState, StoreError>;
}

#[async_trait]
impl<T: CounterStore + ?Sized> CounterStore for Arc<T> {
    async fn limit(&self, key: &str) -> Result<WindowState, StoreError> {
        self.as_ref().limit(key).await
    }
}
