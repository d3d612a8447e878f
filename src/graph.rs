//! The quiz graph model.
//!
//! Nodes are keyed by [`NodeId`]; outgoing edges are kept per source node in
//! authoring order, which is the tie-break order for port resolution.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::canonical::canonical_hash_hex;
use crate::types::{Edge, Node, NodeId, StartNode};

/// Error type for graph construction.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The graph cannot be traversed at all.
    #[error("Malformed graph: {reason}")]
    MalformedGraph {
        /// What is wrong.
        reason: String,
    },
    /// Two nodes share an id.
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),
    /// Fingerprint serialization failed.
    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// Immutable quiz graph.
///
/// Read-only after construction; share it between attempts with `Arc`.
#[derive(Debug, Clone)]
pub struct QuizGraph {
    /// Nodes by id (start node included).
    nodes: BTreeMap<NodeId, Node>,
    /// All edges in authoring order.
    edges: Vec<Edge>,
    /// Source id -> indices into `edges`, in authoring order.
    adjacency: BTreeMap<NodeId, Vec<usize>>,
    /// Traversal root.
    start_id: NodeId,
    /// xxh64 of the canonical node/edge listing.
    fingerprint: String,
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    schema_version: &'static str,
    nodes: Vec<&'a Node>,
    edges: &'a [Edge],
}

impl QuizGraph {
    /// Build a graph from nodes and edges.
    ///
    /// Exactly one start node with a non-empty id must be present. Edge endpoints are not
    /// checked here; see [`crate::loader`] for load-time validation.
    pub fn new(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, GraphError> {
        let mut map: BTreeMap<NodeId, Node> = BTreeMap::new();
        let mut start_id: Option<NodeId> = None;

        for node in nodes {
            let id = node.id().clone();
            if node.is_start() {
                if id.as_str().is_empty() {
                    return Err(GraphError::MalformedGraph {
                        reason: "start node has an empty id".to_string(),
                    });
                }
                if let Some(existing) = &start_id {
                    return Err(GraphError::MalformedGraph {
                        reason: format!("multiple start nodes: {existing} and {id}"),
                    });
                }
                start_id = Some(id.clone());
            }
            if map.contains_key(&id) {
                return Err(GraphError::DuplicateNode(id));
            }
            map.insert(id, node);
        }

        let start_id = start_id.ok_or_else(|| GraphError::MalformedGraph {
            reason: "no start node".to_string(),
        })?;

        let edges: Vec<Edge> = edges.into_iter().collect();
        let mut adjacency: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
        for (index, edge) in edges.iter().enumerate() {
            adjacency
                .entry(edge.source_id.clone())
                .or_default()
                .push(index);
        }

        let fingerprint = canonical_hash_hex(&FingerprintInput {
            schema_version: crate::QUIZ_SCHEMA_VERSION,
            nodes: map.values().collect(),
            edges: &edges,
        })?;

        tracing::debug!(
            nodes = map.len(),
            edges = edges.len(),
            start = %start_id,
            fingerprint = %fingerprint,
            "quiz graph built"
        );

        Ok(Self {
            nodes: map,
            edges,
            adjacency,
            start_id,
            fingerprint,
        })
    }

    /// Id of the start node.
    pub fn start_id(&self) -> &NodeId {
        &self.start_id
    }

    /// The start node.
    pub fn start_node(&self) -> Option<&StartNode> {
        match self.nodes.get(&self.start_id) {
            Some(Node::Start(start)) => Some(start),
            _ => None,
        }
    }

    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Outgoing edges of a node in authoring order.
    pub fn outgoing<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.adjacency
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&index| &self.edges[index])
    }

    /// All nodes, ordered by id.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges in authoring order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of nodes, start node included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of question nodes.
    pub fn num_questions(&self) -> usize {
        self.nodes.values().filter(|n| n.question().is_some()).count()
    }

    /// Sum of all question point values.
    ///
    /// An upper bound on any attempt's score; branching usually makes it
    /// unreachable.
    pub fn total_points(&self) -> u32 {
        self.nodes
            .values()
            .fold(0u32, |acc, n| acc.saturating_add(n.point_value()))
    }

    /// Deterministic fingerprint of the graph content.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}
