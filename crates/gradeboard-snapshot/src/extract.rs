//! Snapshot-to-graph extraction
//!
//! Reconstructs the logical graph from a raw document snapshot:
//! - Non-arrow shape records become nodes with visual properties stripped
//! - Arrow bindings are resolved pairwise into directed edges
//!
//! The function is total. Records missing discriminants, ids or property
//! bags are skipped; an absent or ill-typed store yields an empty graph.

use crate::graph::{GraphEdge, GraphNode, LogicalGraph};
use crate::record::Terminal;
use crate::shape::ShapeKind;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Visual-only property keys, excluded from node props.
///
/// Kept as one table so adding a new visual property is a one-line change.
pub const VISUAL_PROPS: [&str; 12] = [
    "w",
    "h",
    "color",
    "fill",
    "dash",
    "size",
    "font",
    "align",
    "verticalAlign",
    "growY",
    "url",
    "opacity",
];

/// Targets observed for one arrow's terminals.
#[derive(Default)]
struct ArrowTerminals {
    start: Option<String>,
    end: Option<String>,
}

/// Convert a raw editor snapshot into a [`LogicalGraph`].
///
/// Edges are emitted only for arrows with both a start and an end binding;
/// a half-bound arrow is a legitimate in-progress drawing, not an error.
/// Edge endpoints are not checked against the node set: an arrow into a
/// deleted shape is passed through so the reviewer can see the dangling
/// connection.
#[must_use]
pub fn extract(snapshot: &Value) -> LogicalGraph {
    let Some(store) = snapshot.get("store").and_then(Value::as_object) else {
        return LogicalGraph::empty();
    };

    let mut nodes = Vec::new();
    // Arrow id -> targets seen for each terminal; last write wins.
    let mut terminals: HashMap<String, ArrowTerminals> = HashMap::new();

    for record in store.values() {
        match record.get("typeName").and_then(Value::as_str) {
            Some("shape") => {
                let Some(id) = record.get("id").and_then(Value::as_str) else {
                    continue;
                };
                let tag = record.get("type").and_then(Value::as_str).unwrap_or("unknown");
                if ShapeKind::from_tag(tag).is_connector() {
                    continue;
                }
                let props = record
                    .get("props")
                    .and_then(Value::as_object)
                    .map(semantic_props)
                    .unwrap_or_default();
                nodes.push(GraphNode {
                    id: id.to_string(),
                    node_type: tag.to_string(),
                    props,
                });
            }
            Some("binding") => {
                let Some(arrow_id) = record.get("fromId").and_then(Value::as_str) else {
                    continue;
                };
                let Some(target_id) = record.get("toId").and_then(Value::as_str) else {
                    continue;
                };
                let terminal = record
                    .get("props")
                    .and_then(|props| props.get("terminal"))
                    .and_then(Value::as_str);
                let entry = terminals.entry(arrow_id.to_string()).or_default();
                if terminal == Some(Terminal::Start.as_str()) {
                    entry.start = Some(target_id.to_string());
                } else if terminal == Some(Terminal::End.as_str()) {
                    entry.end = Some(target_id.to_string());
                }
            }
            _ => {}
        }
    }

    let edges = terminals
        .into_values()
        .filter_map(|arrow| match (arrow.start, arrow.end) {
            (Some(from), Some(to)) => Some(GraphEdge { from, to }),
            _ => None,
        })
        .collect();

    LogicalGraph { nodes, edges }
}

/// Copy every non-visual property, values kept verbatim.
fn semantic_props(props: &Map<String, Value>) -> Map<String, Value> {
    props
        .iter()
        .filter(|(key, _)| !VISUAL_PROPS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DocumentSnapshot, StoreRecord};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn labeled_props(label: &str) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("w".to_string(), json!(120.0));
        props.insert("h".to_string(), json!(80.0));
        props.insert("color".to_string(), json!("blue"));
        props.insert("label".to_string(), json!(label));
        props
    }

    fn interview_snapshot() -> Value {
        let mut snapshot = DocumentSnapshot::new();
        snapshot
            .insert(StoreRecord::shape("shape:s1", &ShapeKind::Client, labeled_props("web app")))
            .insert(StoreRecord::shape("shape:s2", &ShapeKind::Database, labeled_props("users")))
            .insert(StoreRecord::shape("shape:a1", &ShapeKind::Arrow, Map::new()))
            .insert(StoreRecord::binding("binding:b1", "shape:a1", "shape:s1", Terminal::Start))
            .insert(StoreRecord::binding("binding:b2", "shape:a1", "shape:s2", Terminal::End));
        snapshot.into_value()
    }

    #[test]
    fn absent_store_yields_empty_graph() {
        assert_eq!(extract(&json!({})), LogicalGraph::empty());
        assert_eq!(extract(&json!(null)), LogicalGraph::empty());
        assert_eq!(extract(&json!({ "store": 42 })), LogicalGraph::empty());
        assert_eq!(extract(&json!({ "store": {} })), LogicalGraph::empty());
    }

    #[test]
    fn shapes_become_nodes_arrows_do_not() {
        let graph = extract(&interview_snapshot());
        assert_eq!(graph.node_count(), 2);
        assert!(graph.nodes.iter().all(|node| node.id != "shape:a1"));
    }

    #[test]
    fn visual_props_stripped_semantic_kept() {
        let graph = extract(&interview_snapshot());
        let client = graph.nodes.iter().find(|n| n.id == "shape:s1").unwrap();
        assert_eq!(client.props.get("label"), Some(&json!("web app")));
        assert!(!client.props.contains_key("w"));
        assert!(!client.props.contains_key("h"));
        assert!(!client.props.contains_key("color"));
    }

    #[test]
    fn nested_semantic_values_survive_unchanged() {
        let snapshot = json!({
            "store": {
                "shape:s1": {
                    "typeName": "shape",
                    "id": "shape:s1",
                    "type": "server",
                    "props": {
                        "opacity": 0.5,
                        "meta": { "region": "eu-west-1", "replicas": 3 }
                    }
                }
            }
        });
        let graph = extract(&snapshot);
        assert_eq!(
            graph.nodes[0].props.get("meta"),
            Some(&json!({ "region": "eu-west-1", "replicas": 3 }))
        );
        assert!(!graph.nodes[0].props.contains_key("opacity"));
    }

    #[test]
    fn missing_type_tag_defaults_to_unknown() {
        let snapshot = json!({
            "store": {
                "shape:s1": { "typeName": "shape", "id": "shape:s1", "props": {} }
            }
        });
        let graph = extract(&snapshot);
        assert_eq!(graph.nodes[0].node_type, "unknown");
    }

    #[test]
    fn edge_requires_both_terminals() {
        let graph = extract(&interview_snapshot());
        assert_eq!(graph.edges, vec![GraphEdge { from: "shape:s1".into(), to: "shape:s2".into() }]);

        let mut snapshot = DocumentSnapshot::new();
        snapshot
            .insert(StoreRecord::shape("shape:s1", &ShapeKind::Client, labeled_props("web app")))
            .insert(StoreRecord::shape("shape:s2", &ShapeKind::Database, labeled_props("users")))
            .insert(StoreRecord::shape("shape:a1", &ShapeKind::Arrow, Map::new()))
            .insert(StoreRecord::binding("binding:b1", "shape:a1", "shape:s1", Terminal::Start));
        let graph = extract(&snapshot.into_value());
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn direction_is_start_to_end_not_symmetrized() {
        let mut snapshot = DocumentSnapshot::new();
        snapshot
            .insert(StoreRecord::shape("shape:s1", &ShapeKind::Server, labeled_props("api")))
            .insert(StoreRecord::shape("shape:s2", &ShapeKind::Cache, labeled_props("sessions")))
            .insert(StoreRecord::shape("shape:a1", &ShapeKind::Arrow, Map::new()))
            .insert(StoreRecord::binding("binding:b1", "shape:a1", "shape:s2", Terminal::Start))
            .insert(StoreRecord::binding("binding:b2", "shape:a1", "shape:s1", Terminal::End));
        let graph = extract(&snapshot.into_value());
        assert_eq!(graph.edges, vec![GraphEdge { from: "shape:s2".into(), to: "shape:s1".into() }]);
    }

    #[test]
    fn duplicate_terminal_last_write_wins() {
        let snapshot = json!({
            "store": {
                "binding:b1": {
                    "typeName": "binding", "id": "binding:b1",
                    "fromId": "shape:a1", "toId": "shape:s1",
                    "props": { "terminal": "start" }
                },
                "binding:b2": {
                    "typeName": "binding", "id": "binding:b2",
                    "fromId": "shape:a1", "toId": "shape:s9",
                    "props": { "terminal": "start" }
                },
                "binding:b3": {
                    "typeName": "binding", "id": "binding:b3",
                    "fromId": "shape:a1", "toId": "shape:s2",
                    "props": { "terminal": "end" }
                }
            }
        });
        let graph = extract(&snapshot);
        // Store iteration is key-ordered, so binding:b2 overwrites binding:b1.
        assert_eq!(graph.edges, vec![GraphEdge { from: "shape:s9".into(), to: "shape:s2".into() }]);
    }

    #[test]
    fn bindings_without_ids_are_skipped() {
        let snapshot = json!({
            "store": {
                "binding:b1": {
                    "typeName": "binding", "id": "binding:b1",
                    "toId": "shape:s1",
                    "props": { "terminal": "start" }
                },
                "binding:b2": {
                    "typeName": "binding", "id": "binding:b2",
                    "fromId": "shape:a1",
                    "props": { "terminal": "end" }
                }
            }
        });
        assert_eq!(extract(&snapshot).edge_count(), 0);
    }

    #[test]
    fn foreign_discriminants_are_ignored() {
        let snapshot = json!({
            "store": {
                "page:p1": { "typeName": "page", "id": "page:p1" },
                "camera:c1": { "typeName": "camera", "id": "camera:c1" },
                "shape:s1": { "typeName": "shape", "id": "shape:s1", "type": "server", "props": {} }
            }
        });
        let graph = extract(&snapshot);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.nodes[0].id, "shape:s1");
    }

    #[test]
    fn dangling_edge_endpoints_pass_through() {
        let snapshot = json!({
            "store": {
                "shape:s1": { "typeName": "shape", "id": "shape:s1", "type": "server", "props": {} },
                "binding:b1": {
                    "typeName": "binding", "id": "binding:b1",
                    "fromId": "shape:a1", "toId": "shape:s1",
                    "props": { "terminal": "start" }
                },
                "binding:b2": {
                    "typeName": "binding", "id": "binding:b2",
                    "fromId": "shape:a1", "toId": "shape:deleted",
                    "props": { "terminal": "end" }
                }
            }
        });
        let graph = extract(&snapshot);
        assert_eq!(graph.edges, vec![GraphEdge { from: "shape:s1".into(), to: "shape:deleted".into() }]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let snapshot = interview_snapshot();
        assert_eq!(extract(&snapshot), extract(&snapshot));
    }
}
