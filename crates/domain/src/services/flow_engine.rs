//! Single-hop flow traversal.
//!
//! Walks exactly one edge from a flow's start node and reports what the
//! target node wants to say. There is no session state between turns, so
//! a question node's answer is never collected; every inbound message is
//! evaluated from the start node again.

use tracing::debug;

use crate::models::{FlowGraph, NodeKind};

/// Outcome of traversing a flow.
///
/// Only the two `Reply` variants produce an outbound message; everything
/// else is a silent fall-through to the next routing stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// A message node emitted its text. Traversal terminates.
    ReplyMessage(String),
    /// A question node emitted its prompt. Traversal terminates.
    ReplyQuestion(String),
    /// The graph has no start node.
    NoStartNode,
    /// The start node has no outgoing edge.
    NoOutgoingEdge,
    /// The first edge points at a node id that does not exist.
    TargetMissing,
    /// The target node has an unrecognized type or an empty payload.
    UnhandledNode,
}

impl FlowOutcome {
    /// The reply text, if this outcome emits one.
    pub fn reply(&self) -> Option<&str> {
        match self {
            FlowOutcome::ReplyMessage(text) | FlowOutcome::ReplyQuestion(text) => Some(text),
            _ => None,
        }
    }
}

/// Traverses a flow graph one hop from its start node.
///
/// Read-only; the graph is never mutated.
pub fn traverse(graph: &FlowGraph) -> FlowOutcome {
    let Some(start) = graph.start_node() else {
        debug!("Flow has no start node");
        return FlowOutcome::NoStartNode;
    };

    let Some(edge) = graph.first_edge_from(&start.id) else {
        debug!(start = %start.id, "Start node has no outgoing edge");
        return FlowOutcome::NoOutgoingEdge;
    };

    let Some(target) = graph.node_by_id(&edge.target) else {
        debug!(target = %edge.target, "Edge target not found in graph");
        return FlowOutcome::TargetMissing;
    };

    match target.kind {
        NodeKind::Message => match non_empty(target.data.message.as_deref()) {
            Some(text) => FlowOutcome::ReplyMessage(text.to_string()),
            None => FlowOutcome::UnhandledNode,
        },
        NodeKind::Question => match non_empty(target.data.question.as_deref()) {
            Some(text) => FlowOutcome::ReplyQuestion(text.to_string()),
            None => FlowOutcome::UnhandledNode,
        },
        NodeKind::Start | NodeKind::Unknown => {
            debug!(target = %target.id, kind = ?target.kind, "Unhandled node type");
            FlowOutcome::UnhandledNode
        }
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
