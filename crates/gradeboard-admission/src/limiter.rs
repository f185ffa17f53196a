//! Fail-open rate limiter
//!
//! Admission is availability-over-strictness: grading keeps working when the
//! counter backend is unconfigured or down, while a healthy backend enforces
//! the quota. Whether the backend is present is decided once, at
//! construction, as a variant of the limiter itself.

use crate::store::{CounterStore, WindowState};
use crate::upstash::UpstashCounterStore;
use chrono::Utc;
use std::time::Duration;

/// Sentinel `remaining` reported when no quota is being enforced.
pub const FAIL_OPEN_REMAINING: u32 = 999;

/// Quota per rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Admitted events per window
    pub quota: u32,
    /// Rolling window length
    pub window: Duration,
}

impl RateLimitPolicy {
    /// Policy with an explicit quota and window.
    #[inline]
    #[must_use]
    pub fn new(quota: u32, window: Duration) -> Self {
        Self { quota, window }
    }

    /// Window length in milliseconds.
    #[inline]
    #[must_use]
    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

impl Default for RateLimitPolicy {
    /// 5 events per rolling hour.
    fn default() -> Self {
        Self::new(5, Duration::from_secs(3600))
    }
}

/// Result of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionDecision {
    /// Whether the request may proceed
    pub admitted: bool,
    /// Quota units left in the window
    pub remaining: u32,
    /// When the window resets, epoch milliseconds
    pub reset_at: i64,
}

/// Per-user admission controller.
#[derive(Debug)]
pub enum RateLimiter {
    /// No backend configured; every request is admitted.
    Disabled,
    /// Quota enforced through the counter store.
    Enabled {
        /// The atomic counter backend
        store: Box<dyn CounterStore>,
    },
}

impl RateLimiter {
    /// Limiter that admits everything.
    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self::Disabled
    }

    /// Limiter enforcing the store's window policy.
    #[must_use]
    pub fn new(store: impl CounterStore + 'static) -> Self {
        Self::Enabled { store: Box::new(store) }
    }

    /// Limiter from environment credentials.
    ///
    /// Missing or invalid credentials disable enforcement; the warning is
    /// logged here, once, rather than on every check.
    #[must_use]
    pub fn from_env(policy: RateLimitPolicy) -> Self {
        match UpstashCounterStore::from_env(policy) {
            Some(store) => Self::new(store),
            None => {
                tracing::warn!("counter store credentials not configured; admitting all grading requests");
                Self::Disabled
            }
        }
    }

    /// Whether a quota is actually being enforced.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    /// Check and charge one admission for `user_id`.
    ///
    /// A reachable backend decides; an unreachable one fails open so that a
    /// down limiter never takes grading down with it.
    pub async fn check(&self, user_id: &str) -> AdmissionDecision {
        match self {
            Self::Disabled => fail_open(),
            Self::Enabled { store } => match store.limit(user_id).await {
                Ok(state) => {
                    tracing::debug!(
                        user = user_id,
                        allowed = state.allowed,
                        remaining = state.remaining,
                        "admission check"
                    );
                    state.into()
                }
                Err(error) => {
                    tracing::warn!(user = user_id, %error, "counter store unavailable; admitting request");
                    fail_open()
                }
            },
        }
    }
}

fn fail_open() -> AdmissionDecision {
    AdmissionDecision {
        admitted: true,
        remaining: FAIL_OPEN_REMAINING,
        reset_at: Utc::now().timestamp_millis(),
    }
}

impl From<WindowState> for AdmissionDecision {
    fn from(state: WindowState) -> Self {
        Self {
            admitted: state.allowed,
            remaining: state.remaining,
            reset_at: state.reset_at,
        }
    }
}
