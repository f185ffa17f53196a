//! Testing utilities for the gradeboard workspace
//!
//! Shared fixtures: snapshot builders, a scripted oracle and a
//! deterministic in-memory counter store with a manual clock.

#![allow(missing_docs)]

use async_trait::async_trait;
use gradeboard_admission::{CounterStore, RateLimitPolicy, StoreError, WindowState};
use gradeboard_oracle::{Oracle, OracleError};
use gradeboard_snapshot::shape::{ClientPlatform, ClientProps, DatabaseEngine, DatabaseProps, LabeledProps};
use gradeboard_snapshot::{DocumentSnapshot, ShapeKind, StoreRecord, Terminal};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Snapshot fixtures
// ---------------------------------------------------------------------------

fn to_map(props: impl Serialize) -> Map<String, Value> {
    match serde_json::to_value(props) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Visual keys every editor shape carries beyond its typed props.
fn with_visual_noise(mut props: Map<String, Value>) -> Map<String, Value> {
    props.insert("color".to_string(), json!("blue"));
    props.insert("opacity".to_string(), json!(1.0));
    props
}

pub fn client_shape(id: &str, label: &str) -> StoreRecord {
    let props = ClientProps {
        w: 100.0,
        h: 60.0,
        client_type: ClientPlatform::Web,
        label: label.to_string(),
    };
    StoreRecord::shape(id, &ShapeKind::Client, with_visual_noise(to_map(props)))
}

pub fn database_shape(id: &str, label: &str) -> StoreRecord {
    let props = DatabaseProps {
        w: 120.0,
        h: 80.0,
        db_type: DatabaseEngine::Postgres,
        label: label.to_string(),
    };
    StoreRecord::shape(id, &ShapeKind::Database, with_visual_noise(to_map(props)))
}

pub fn server_shape(id: &str, label: &str) -> StoreRecord {
    let props = LabeledProps { w: 120.0, h: 80.0, label: label.to_string() };
    StoreRecord::shape(id, &ShapeKind::Server, with_visual_noise(to_map(props)))
}

pub fn cache_shape(id: &str, label: &str) -> StoreRecord {
    let props = LabeledProps { w: 120.0, h: 80.0, label: label.to_string() };
    StoreRecord::shape(id, &ShapeKind::Cache, with_visual_noise(to_map(props)))
}

pub fn load_balancer_shape(id: &str, label: &str) -> StoreRecord {
    let props = LabeledProps { w: 120.0, h: 80.0, label: label.to_string() };
    StoreRecord::shape(id, &ShapeKind::LoadBalancer, with_visual_noise(to_map(props)))
}

pub fn arrow_shape(id: &str) -> StoreRecord {
    StoreRecord::shape(id, &ShapeKind::Arrow, Map::new())
}

pub fn start_binding(id: &str, arrow_id: &str, target_id: &str) -> StoreRecord {
    StoreRecord::binding(id, arrow_id, target_id, Terminal::Start)
}

pub fn end_binding(id: &str, arrow_id: &str, target_id: &str) -> StoreRecord {
    StoreRecord::binding(id, arrow_id, target_id, Terminal::End)
}

pub fn snapshot_of(records: impl IntoIterator<Item = StoreRecord>) -> Value {
    let mut snapshot = DocumentSnapshot::new();
    for record in records {
        snapshot.insert(record);
    }
    snapshot.into_value()
}

/// One client wired to one database: the smallest gradeable design.
pub fn interview_snapshot() -> Value {
    snapshot_of([
        client_shape("shape:s1", "web app"),
        database_shape("shape:s2", "users"),
        arrow_shape("shape:a1"),
        start_binding("binding:b1", "shape:a1", "shape:s1"),
        end_binding("binding:b2", "shape:a1", "shape:s2"),
    ])
}

// ---------------------------------------------------------------------------
// Oracle fixtures
// ---------------------------------------------------------------------------

/// A schema-conformant verdict payload.
pub fn sample_verdict() -> Value {
    json!({
        "score": 6,
        "feedback": "Solid basic flow; the single server is a bottleneck.",
        "strengths": ["clear client-to-database path"],
        "weaknesses": ["no redundancy"],
        "missingComponents": ["load balancer", "cache"],
        "securityRisks": ["client talks to the database directly"]
    })
}

/// Oracle that replays a prepared script of responses.
///
/// Counts every call; an exhausted script answers
/// [`OracleError::MissingContent`].
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    responses: Mutex<VecDeque<Result<Value, OracleError>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_response(self, value: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(value));
        self
    }

    #[must_use]
    pub fn with_error(self, error: OracleError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Handle onto the call counter, usable after the oracle is moved.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn generate(&self, _prompt: &str) -> Result<Value, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(OracleError::MissingContent))
    }
}

// ---------------------------------------------------------------------------
// Counter-store fixtures
// ---------------------------------------------------------------------------

/// Sliding-log counter store with a manually advanced clock.
///
/// Every `limit` call records one event, admitted or not, mirroring the
/// production backend's charge-on-check behavior.
#[derive(Debug)]
pub struct InMemoryCounterStore {
    policy: RateLimitPolicy,
    now_ms: AtomicI64,
    events: Mutex<HashMap<String, Vec<i64>>>,
}

impl InMemoryCounterStore {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            now_ms: AtomicI64::new(0),
            events: Mutex::new(HashMap::new()),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, delta: Duration) {
        self.now_ms.fetch_add(delta.as_millis() as i64, Ordering::SeqCst);
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn limit(&self, key: &str) -> Result<WindowState, StoreError> {
        let now = self.now_ms.load(Ordering::SeqCst);
        let window = self.policy.window_ms();
        let mut events = self.events.lock().unwrap();
        let log = events.entry(key.to_string()).or_default();
        log.retain(|&at| at > now - window);
        log.push(now);
        let used = log.len() as u32;
        Ok(WindowState {
            allowed: used <= self.policy.quota,
            remaining: self.policy.quota.saturating_sub(used),
            reset_at: log.first().copied().unwrap_or(now) + window,
        })
    }
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Install a test subscriber honoring `RUST_LOG`; safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
