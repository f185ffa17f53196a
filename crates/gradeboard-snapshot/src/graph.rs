//! Logical graph
//!
//! The semantic-only projection of a snapshot: nodes for non-arrow shapes,
//! directed edges for fully bound arrows. Built fresh per grading request,
//! serialized into the oracle prompt, then discarded.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One component of the design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Source shape record id
    pub id: String,
    /// Shape kind tag (`"unknown"` when the record carried none)
    #[serde(rename = "type")]
    pub node_type: String,
    /// Semantic properties, visual keys stripped
    pub props: Map<String, Value>,
}

/// One directed connection, tail to head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Start-terminal target node id
    pub from: String,
    /// End-terminal target node id
    pub to: String,
}

/// The full node/edge projection of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicalGraph {
    /// Components
    pub nodes: Vec<GraphNode>,
    /// Connections
    pub edges: Vec<GraphEdge>,
}

impl LogicalGraph {
    /// Graph with no nodes and no edges.
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when there is nothing to evaluate.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of components.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of connections.
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Distinct component types, first-seen order.
    #[must_use]
    pub fn distinct_node_types(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for node in &self.nodes {
            if !seen.contains(&node.node_type.as_str()) {
                seen.push(node.node_type.as_str());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, node_type: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            node_type: node_type.to_string(),
            props: Map::new(),
        }
    }

    #[test]
    fn empty_graph_has_nothing_to_evaluate() {
        let graph = LogicalGraph::empty();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn distinct_types_dedup_in_first_seen_order() {
        let graph = LogicalGraph {
            nodes: vec![node("a", "server"), node("b", "database"), node("c", "server")],
            edges: vec![],
        };
        assert_eq!(graph.distinct_node_types(), vec!["server", "database"]);
    }

    #[test]
    fn node_serializes_with_type_key() {
        let value = serde_json::to_value(node("shape:s1", "cache")).unwrap();
        assert_eq!(value["type"], "cache");
        assert_eq!(value["id"], "shape:s1");
    }
}
