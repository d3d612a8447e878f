//! Serialized quiz documents.
//!
//! A [`QuizDocument`] mirrors the on-disk JSON layout: question nodes
//! grouped by kind, one start node, and a flat edge list in authoring order.
//! Loading validates what the engine relies on the loader for: every edge
//! endpoint must name an existing node.
//!
//! Both the camelCase layout and the authoring tool's legacy field names
//! (`GUID`, `QuestionText`, `startNodeData`, `outputNodeGUID`, …) are read.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::graph::{GraphError, QuizGraph};
use crate::types::{Edge, Node, NodeId, QuestionNode, StartNode};

/// Error type for loading and saving quiz documents.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading or writing the file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON for the schema.
    #[error("Invalid quiz JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// An edge refers to a node that does not exist.
    #[error("Edge {source_id}:{source_port} -> {target_id} refers to a missing node")]
    DanglingEdge {
        /// Source node of the edge.
        source_id: NodeId,
        /// Source port of the edge.
        source_port: String,
        /// Target node of the edge.
        target_id: NodeId,
    },
    /// The nodes do not form a usable graph.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Serialized form of a quiz graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDocument {
    /// Multiple-choice questions.
    #[serde(default)]
    pub multiple_choice_nodes: Vec<QuestionNode>,
    /// True/false questions.
    #[serde(default)]
    pub true_false_nodes: Vec<QuestionNode>,
    /// Entry point.
    #[serde(default, alias = "startNodeData")]
    pub start_node: Option<StartNode>,
    /// Edges in authoring order.
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl QuizDocument {
    /// Parse a document from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the document as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rebuild a document from a graph.
    ///
    /// Nodes come out ordered by id; edges keep authoring order.
    pub fn from_graph(graph: &QuizGraph) -> Self {
        let mut doc = Self {
            edges: graph.edges().to_vec(),
            ..Self::default()
        };
        for node in graph.nodes() {
            match node {
                Node::Start(start) => doc.start_node = Some(start.clone()),
                Node::MultipleChoice(q) => doc.multiple_choice_nodes.push(q.clone()),
                Node::TrueFalse(q) => doc.true_false_nodes.push(q.clone()),
            }
        }
        doc
    }

    /// Validate edges and build the graph.
    pub fn into_graph(self) -> Result<QuizGraph, LoadError> {
        let mut ids: BTreeSet<NodeId> = BTreeSet::new();
        let mut nodes: Vec<Node> = Vec::with_capacity(
            self.multiple_choice_nodes.len() + self.true_false_nodes.len() + 1,
        );

        if let Some(start) = self.start_node {
            ids.insert(start.id.clone());
            nodes.push(Node::Start(start));
        }
        for q in self.multiple_choice_nodes {
            ids.insert(q.id.clone());
            nodes.push(Node::multiple_choice(q));
        }
        for q in self.true_false_nodes {
            ids.insert(q.id.clone());
            nodes.push(Node::true_false(q));
        }

        if let Some(edge) = self
            .edges
            .iter()
            .find(|e| !ids.contains(&e.source_id) || !ids.contains(&e.target_id))
        {
            return Err(LoadError::DanglingEdge {
                source_id: edge.source_id.clone(),
                source_port: edge.source_port.clone(),
                target_id: edge.target_id.clone(),
            });
        }

        Ok(QuizGraph::new(nodes, self.edges)?)
    }
}

impl QuizGraph {
    /// Parse and validate a graph from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        QuizDocument::from_json_str(json)?.into_graph()
    }

    /// Load and validate a graph from a JSON file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let graph = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            nodes = graph.num_nodes(),
            edges = graph.num_edges(),
            fingerprint = %graph.fingerprint(),
            "quiz graph loaded"
        );
        Ok(graph)
    }

    /// Write the graph to a JSON file.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let json = QuizDocument::from_graph(self).to_json_pretty()?;
        std::fs::write(path, json).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
