//! Flow graph domain models.
//!
//! A flow is a small directed graph authored in the drag-and-drop editor and
//! persisted as one JSON document per (tenant, trigger intent). The wire
//! format is the editor's native shape:
//!
//! ```json
//! {
//!   "nodes": [{ "id", "type", "data": { "title", "message", "question" }, "position" }],
//!   "edges": [{ "source", "target" }]
//! }
//! ```
//!
//! Node types are a closed sum here, so traversal matches exhaustively and a
//! new editor node type is a compile-time decision rather than a stringly
//! comparison scattered through the engine.

use serde::{Deserialize, Serialize};

/// The kind of a flow node, mapped from the editor's `type` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// The flow's trigger marker. Exactly one per well-formed graph.
    #[serde(rename = "input")]
    Start,
    /// A node that sends a fixed text message.
    #[serde(rename = "editableNode")]
    Message,
    /// A node that asks the user a question.
    #[serde(rename = "questionNode")]
    Question,
    /// Any type string this version does not understand.
    #[serde(other, rename = "unknown")]
    Unknown,
}

/// Payload carried by a node. Which field is populated depends on the kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

/// Canvas position. UI-only, carried through verbatim so saving a graph
/// back does not lose the editor layout.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NodePosition {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// One node of a flow graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub data: NodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<NodePosition>,
}

/// One directed, unlabeled edge between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
}

/// A complete flow graph as persisted by the editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    /// Finds the graph's start node, if any.
    ///
    /// Returns the first start node in stored order. A graph with zero or
    /// multiple start nodes is a degraded authoring state; traversal treats
    /// "zero" as malformed and silently uses the first of "multiple".
    pub fn start_node(&self) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Start)
    }

    /// Finds a node by id.
    pub fn node_by_id(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Finds the first edge (in stored order) leaving the given node.
    ///
    /// Outbound edges are not deduplicated at save time; the first one wins.
    pub fn first_edge_from(&self, source_id: &str) -> Option<&FlowEdge> {
        self.edges.iter().find(|e| e.source == source_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph_json() -> serde_json::Value {
        serde_json::json!({
            "nodes": [
                {
                    "id": "start-1",
                    "type": "input",
                    "data": { "title": "Trigger" },
                    "position": { "x": 100.0, "y": 50.0 }
                },
                {
                    "id": "msg-1",
                    "type": "editableNode",
                    "data": { "title": "Reply", "message": "Hello" },
                    "position": { "x": 100.0, "y": 200.0 }
                }
            ],
            "edges": [
                { "source": "start-1", "target": "msg-1" }
            ]
        })
    }

    #[test]
    fn test_deserialize_editor_document() {
        let graph: FlowGraph = serde_json::from_value(sample_graph_json()).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.nodes[0].kind, NodeKind::Start);
        assert_eq!(graph.nodes[1].kind, NodeKind::Message);
        assert_eq!(graph.nodes[1].data.message.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_unknown_node_type_deserializes_to_unknown() {
        let json = serde_json::json!({
            "nodes": [{ "id": "n1", "type": "carouselNode", "data": {} }],
            "edges": []
        });
        let graph: FlowGraph = serde_json::from_value(json).unwrap();
        assert_eq!(graph.nodes[0].kind, NodeKind::Unknown);
    }

    #[test]
    fn test_start_node_lookup() {
        let graph: FlowGraph = serde_json::from_value(sample_graph_json()).unwrap();
        assert_eq!(graph.start_node().unwrap().id, "start-1");
    }

    #[test]
    fn test_start_node_absent() {
        let graph = FlowGraph::default();
        assert!(graph.start_node().is_none());
    }

    #[test]
    fn test_first_edge_from_respects_stored_order() {
        let json = serde_json::json!({
            "nodes": [{ "id": "s", "type": "input", "data": {} }],
            "edges": [
                { "source": "s", "target": "a" },
                { "source": "s", "target": "b" }
            ]
        });
        let graph: FlowGraph = serde_json::from_value(json).unwrap();
        assert_eq!(graph.first_edge_from("s").unwrap().target, "a");
    }

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let graph: FlowGraph = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_serialize_preserves_wire_type_names() {
        let graph: FlowGraph = serde_json::from_value(sample_graph_json()).unwrap();
        let value = serde_json::to_value(&graph).unwrap();
        assert_eq!(value["nodes"][0]["type"], "input");
        assert_eq!(value["nodes"][1]["type"], "editableNode");
    }
}
