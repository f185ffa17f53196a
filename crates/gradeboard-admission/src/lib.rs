//! Gradeboard Admission - rate-limit admission control
//!
//! Guards the metered oracle call with a per-user sliding-window quota:
//! - [`CounterStore`]: the seam over an external atomic counter backend
//! - [`UpstashCounterStore`]: Redis-over-REST reference backend
//! - [`RateLimiter`]: fail-open admission check, `Disabled | Enabled` decided
//!   once at construction
//!
//! The limiter holds no locks; per-key serialization of increments is the
//! backend's contract.

pub mod limiter;
pub mod store;
pub mod upstash;

pub use limiter::{AdmissionDecision, RateLimitPolicy, RateLimiter, FAIL_OPEN_REMAINING};
pub use store::{CounterStore, StoreError, WindowState};
pub use upstash::UpstashCounterStore;
