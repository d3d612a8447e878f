//! Edge types for the quiz graph.

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Output port of a true/false node followed for answer index 0.
pub const TRUE_PORT: &str = "True";

/// Output port of a true/false node followed for any other answer index.
pub const FALSE_PORT: &str = "False";

/// Port name of the multiple-choice answer at `index` (zero-based).
pub fn answer_port(index: usize) -> String {
    format!("Answer {}", index + 1)
}

/// Directed, port-qualified connection between two nodes.
///
/// The source port is the routing key: it must match the port name the
/// source node's answer semantics produce. The target port is carried for
/// round-trip fidelity only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Source node.
    #[serde(alias = "outputNodeGUID")]
    pub source_id: NodeId,
    /// Output port on the source node.
    #[serde(alias = "outputPortName")]
    pub source_port: String,
    /// Target node.
    #[serde(alias = "inputNodeGUID")]
    pub target_id: NodeId,
    /// Input port on the target node.
    #[serde(default, alias = "inputPortName")]
    pub target_port: String,
}

impl Edge {
    /// Create a new edge.
    pub fn new(
        source_id: impl Into<NodeId>,
        source_port: impl Into<String>,
        target_id: impl Into<NodeId>,
        target_port: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            source_port: source_port.into(),
            target_id: target_id.into(),
            target_port: target_port.into(),
        }
    }

    /// Create an edge into the default `"Input"` port of the target.
    pub fn to_input(
        source_id: impl Into<NodeId>,
        source_port: impl Into<String>,
        target_id: impl Into<NodeId>,
    ) -> Self {
        Self::new(source_id, source_port, target_id, "Input")
    }
}
