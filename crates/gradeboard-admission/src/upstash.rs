//! Upstash-style Redis-over-REST counter backend
//!
//! Runs a sliding-window script through the REST eval endpoint. The window
//! is approximated by weighting the previous fixed window against the
//! current one, the same scheme the hosted rate-limit service uses. The
//! script is the atomicity boundary: increment and read happen in one
//! round trip.

use crate::limiter::RateLimitPolicy;
use crate::store::{CounterStore, StoreError, WindowState};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

/// Environment variable holding the REST endpoint URL.
pub const ENV_REST_URL: &str = "UPSTASH_REDIS_REST_URL";
/// Environment variable holding the REST bearer token.
pub const ENV_REST_TOKEN: &str = "UPSTASH_REDIS_REST_TOKEN";

/// Key namespace for grading admission counters.
const KEY_PREFIX: &str = "gradeboard:grade";

/// Increment the current window slot and read the previous one, atomically.
const SLIDING_WINDOW_SCRIPT: &str = r#"
local curr = redis.call("INCR", KEYS[1])
if curr == 1 then
  redis.call("PEXPIRE", KEYS[1], ARGV[1])
end
local prev = redis.call("GET", KEYS[2])
if prev == false then
  prev = 0
end
return {curr, tonumber(prev)}
"#;

/// REST counter client with a fixed window policy.
#[derive(Debug, Clone)]
pub struct UpstashCounterStore {
    http: reqwest::Client,
    url: String,
    token: String,
    policy: RateLimitPolicy,
}

#[derive(Debug, Deserialize)]
struct RestResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl UpstashCounterStore {
    /// Client against an explicit endpoint.
    #[must_use]
    pub fn new(url: impl Into<String>, token: impl Into<String>, policy: RateLimitPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            token: token.into(),
            policy,
        }
    }

    /// Client from `UPSTASH_REDIS_REST_URL` / `UPSTASH_REDIS_REST_TOKEN`.
    ///
    /// Returns `None` when either variable is missing or the URL is not
    /// `https://` - a configuration state, not an error.
    #[must_use]
    pub fn from_env(policy: RateLimitPolicy) -> Option<Self> {
        let url = std::env::var(ENV_REST_URL).ok()?;
        let token = std::env::var(ENV_REST_TOKEN).ok()?;
        if !url.starts_with("https://") {
            return None;
        }
        Some(Self::new(url, token, policy))
    }

    async fn eval_window(&self, cur_key: &str, prev_key: &str, expiry_ms: i64) -> Result<(i64, i64), StoreError> {
        let expiry = expiry_ms.to_string();
        let command = [
            "EVAL",
            SLIDING_WINDOW_SCRIPT,
            "2",
            cur_key,
            prev_key,
            expiry.as_str(),
        ];
        let response: RestResponse = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&command)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(message) = response.error {
            return Err(StoreError::Backend(message));
        }
        let result = response
            .result
            .ok_or_else(|| StoreError::Malformed("missing result field".to_string()))?;
        let counts = result
            .as_array()
            .filter(|array| array.len() == 2)
            .ok_or_else(|| StoreError::Malformed(format!("expected [curr, prev], got {result}")))?;
        match (counts[0].as_i64(), counts[1].as_i64()) {
            (Some(curr), Some(prev)) => Ok((curr, prev)),
            _ => Err(StoreError::Malformed(format!("non-integer counts in {result}"))),
        }
    }
}

#[async_trait]
impl CounterStore for UpstashCounterStore {
    async fn limit(&self, key: &str) -> Result<WindowState, StoreError> {
        let window_ms = self.policy.window_ms();
        let now = Utc::now().timestamp_millis();
        let slot = now.div_euclid(window_ms);
        let cur_key = format!("{KEY_PREFIX}:{key}:{slot}");
        let prev_key = format!("{KEY_PREFIX}:{key}:{}", slot - 1);

        // Expiry covers the slot's later life as the "previous" window.
        let (curr, prev) = self.eval_window(&cur_key, &prev_key, window_ms * 2).await?;
        Ok(window_state(self.policy.quota, window_ms, now, curr, prev))
    }
}

/// Fold raw slot counts into a window decision.
///
/// The previous slot is weighted by how much of it still overlaps the
/// sliding window ending now; the current count already includes this call's
/// increment.
fn window_state(quota: u32, window_ms: i64, now: i64, curr: i64, prev: i64) -> WindowState {
    let slot = now.div_euclid(window_ms);
    let elapsed = (now - slot * window_ms) as f64 / window_ms as f64;
    let weighted = curr as f64 + prev as f64 * (1.0 - elapsed);
    let used = weighted.ceil() as u32;
    WindowState {
        allowed: used <= quota,
        remaining: quota.saturating_sub(used),
        reset_at: (slot + 1) * window_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;

    #[test]
    fn fresh_window_admits_and_counts_down() {
        let state = window_state(5, HOUR_MS, HOUR_MS * 10, 1, 0);
        assert!(state.allowed);
        assert_eq!(state.remaining, 4);
        assert_eq!(state.reset_at, HOUR_MS * 11);
    }

    #[test]
    fn quota_boundary_is_inclusive() {
        let state = window_state(5, HOUR_MS, HOUR_MS * 10, 5, 0);
        assert!(state.allowed);
        assert_eq!(state.remaining, 0);

        let state = window_state(5, HOUR_MS, HOUR_MS * 10, 6, 0);
        assert!(!state.allowed);
        assert_eq!(state.remaining, 0);
    }

    #[test]
    fn previous_window_weighs_in_near_slot_start() {
        // 1% into the slot: almost the whole previous window still counts.
        let now = HOUR_MS * 10 + HOUR_MS / 100;
        let state = window_state(5, HOUR_MS, now, 1, 5);
        assert!(!state.allowed);
    }

    #[test]
    fn previous_window_fades_out_near_slot_end() {
        // 99% into the slot: the previous window barely registers.
        let now = HOUR_MS * 10 + HOUR_MS - HOUR_MS / 100;
        let state = window_state(5, HOUR_MS, now, 1, 5);
        assert!(state.allowed);
        assert_eq!(state.remaining, 3);
    }

    #[test]
    fn from_env_requires_https() {
        // Serialized through a single test to avoid env races.
        std::env::remove_var(ENV_REST_URL);
        std::env::remove_var(ENV_REST_TOKEN);
        assert!(UpstashCounterStore::from_env(RateLimitPolicy::default()).is_none());

        std::env::set_var(ENV_REST_URL, "http://plain.example.com");
        std::env::set_var(ENV_REST_TOKEN, "token");
        assert!(UpstashCounterStore::from_env(RateLimitPolicy::default()).is_none());

        std::env::set_var(ENV_REST_URL, "https://example.upstash.io");
        assert!(UpstashCounterStore::from_env(RateLimitPolicy::default()).is_some());

        std::env::remove_var(ENV_REST_URL);
        std::env::remove_var(ENV_REST_TOKEN);
    }
}
