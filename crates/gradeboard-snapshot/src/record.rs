//! Store records
//!
//! A snapshot is a flat `id -> record` mapping under a `store` key. Records
//! are discriminated by `typeName`: shapes carry a kind tag and a property
//! bag, bindings attach one arrow terminal to a target record.

use crate::shape::ShapeKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Terminal role of an arrow binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terminal {
    /// The arrow's tail
    Start,
    /// The arrow's head
    End,
}

impl Terminal {
    /// Wire representation of the terminal role.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// One record of the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "typeName", rename_all = "camelCase")]
pub enum StoreRecord {
    /// A drawable element
    #[serde(rename_all = "camelCase")]
    Shape {
        /// Record id (shared with the emitted graph node)
        id: String,
        /// Shape kind tag
        #[serde(rename = "type")]
        shape_type: String,
        /// Mixed visual and semantic properties
        props: Map<String, Value>,
    },
    /// A relation attaching an arrow terminal to a shape
    #[serde(rename_all = "camelCase")]
    Binding {
        /// Record id
        id: String,
        /// Owning arrow record id
        from_id: String,
        /// Bound target record id
        to_id: String,
        /// Binding properties (carries `terminal`)
        props: Map<String, Value>,
    },
}

impl StoreRecord {
    /// Build a shape record from a catalog kind and property bag.
    #[must_use]
    pub fn shape(id: impl Into<String>, kind: &ShapeKind, props: Map<String, Value>) -> Self {
        Self::Shape {
            id: id.into(),
            shape_type: kind.tag().to_string(),
            props,
        }
    }

    /// Build an arrow-terminal binding record.
    #[must_use]
    pub fn binding(
        id: impl Into<String>,
        arrow_id: impl Into<String>,
        target_id: impl Into<String>,
        terminal: Terminal,
    ) -> Self {
        let mut props = Map::new();
        props.insert("terminal".to_string(), Value::String(terminal.as_str().to_string()));
        Self::Binding {
            id: id.into(),
            from_id: arrow_id.into(),
            to_id: target_id.into(),
            props,
        }
    }

    /// The record's store id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Shape { id, .. } | Self::Binding { id, .. } => id,
        }
    }
}

/// A typed point-in-time serialization of the document.
///
/// Used to author snapshots (fixtures, the editor boundary). The extractor
/// itself reads raw JSON so that ill-typed input degrades instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Flat record store, keyed by record id
    #[serde(default)]
    pub store: BTreeMap<String, StoreRecord>,
}

impl DocumentSnapshot {
    /// Empty document.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its own id.
    pub fn insert(&mut self, record: StoreRecord) -> &mut Self {
        self.store.insert(record.id().to_string(), record);
        self
    }

    /// The raw JSON form consumed by [`crate::extract`].
    #[must_use]
    pub fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_record_wire_format() {
        let record = StoreRecord::shape("shape:s1", &ShapeKind::Database, Map::new());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["typeName"], "shape");
        assert_eq!(value["type"], "database");
        assert_eq!(value["id"], "shape:s1");
    }

    #[test]
    fn binding_record_wire_format() {
        let record = StoreRecord::binding("binding:b1", "shape:a1", "shape:s1", Terminal::Start);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["typeName"], "binding");
        assert_eq!(value["fromId"], "shape:a1");
        assert_eq!(value["toId"], "shape:s1");
        assert_eq!(value["props"]["terminal"], "start");
    }

    #[test]
    fn snapshot_keys_records_by_id() {
        let mut snapshot = DocumentSnapshot::new();
        snapshot.insert(StoreRecord::shape("shape:s1", &ShapeKind::Server, Map::new()));
        let value = snapshot.into_value();
        assert_eq!(value["store"]["shape:s1"]["typeName"], "shape");
    }

    #[test]
    fn record_round_trip() {
        let record = StoreRecord::binding("binding:b2", "shape:a1", "shape:s2", Terminal::End);
        let value = serde_json::to_value(&record).unwrap();
        let back: StoreRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
