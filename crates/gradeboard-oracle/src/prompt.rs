//! Grading prompt
//!
//! Deterministic: the problem statement, the serialized logical graph and a
//! few aggregates, phrased as a design-review rubric. No visual data is ever
//! included.

use gradeboard_snapshot::LogicalGraph;

/// Render the review prompt for one diagram and problem statement.
#[must_use]
pub fn build_grading_prompt(problem_statement: &str, graph: &LogicalGraph) -> String {
    let graph_json = serde_json::to_string_pretty(graph).unwrap_or_default();
    let component_types = graph.distinct_node_types().join(", ");

    format!(
        r#"You are a Senior Staff Engineer conducting a system design interview.

The candidate is trying to solve this problem: "{problem_statement}"

Analyze their design based on:
1. Scalability - Are there single points of failure? Can the system handle increased load?
2. Data Consistency - Is the data flow logical? Are there potential consistency issues?
3. Component Choice - Are the right components used for the problem?
4. Security - Are there obvious security risks or vulnerabilities?
5. Completeness - What essential components are missing?

Here is their current design represented as a graph:
{graph_json}

Component types found: {component_types}
Total components: {node_count}
Total connections: {edge_count}

Provide:
- A score from 1-10 (be fair but rigorous)
- Detailed feedback explaining the score
- A list of strengths (what they did well)
- A list of weaknesses (what could be improved)
- Missing components they should consider adding
- Any security risks you identified"#,
        node_count = graph.node_count(),
        edge_count = graph.edge_count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradeboard_snapshot::{GraphEdge, GraphNode};
    use serde_json::Map;

    fn sample_graph() -> LogicalGraph {
        let node = |id: &str, node_type: &str| GraphNode {
            id: id.to_string(),
            node_type: node_type.to_string(),
            props: Map::new(),
        };
        LogicalGraph {
            nodes: vec![node("shape:s1", "client"), node("shape:s2", "database")],
            edges: vec![GraphEdge { from: "shape:s1".into(), to: "shape:s2".into() }],
        }
    }

    #[test]
    fn prompt_embeds_problem_and_aggregates() {
        let prompt = build_grading_prompt("Design a URL shortener", &sample_graph());
        assert!(prompt.contains("Design a URL shortener"));
        assert!(prompt.contains("Component types found: client, database"));
        assert!(prompt.contains("Total components: 2"));
        assert!(prompt.contains("Total connections: 1"));
    }

    #[test]
    fn prompt_embeds_the_serialized_graph() {
        let prompt = build_grading_prompt("p", &sample_graph());
        assert!(prompt.contains("\"shape:s1\""));
        assert!(prompt.contains("\"type\": \"database\""));
    }

    #[test]
    fn prompt_is_deterministic() {
        let graph = sample_graph();
        assert_eq!(build_grading_prompt("p", &graph), build_grading_prompt("p", &graph));
    }
}
