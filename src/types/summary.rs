//! Attempt summary handed to callers when a quiz ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::NodeId;
use super::result::ResultEntry;

/// Why an attempt reached the finished state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FinishReason {
    /// The start node has no outgoing edge.
    NoSuccessor,
    /// No outgoing edge matched the routed port.
    NoMatchingEdge {
        /// Node the attempt ended on.
        node_id: NodeId,
        /// Port that was looked for. `None` for a node routed by first edge.
        port: Option<String>,
    },
    /// An edge pointed at a node that does not exist.
    UnknownNode {
        /// The missing id.
        node_id: NodeId,
    },
    /// Start-node pass-through looped without reaching a question.
    PassThroughLimit {
        /// Node where the loop was cut.
        node_id: NodeId,
    },
}

impl FinishReason {
    /// Whether the attempt ended because the graph was inconsistent.
    pub fn is_abnormal(&self) -> bool {
        matches!(self, Self::UnknownNode { .. } | Self::PassThroughLimit { .. })
    }
}

/// Outcome of one quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    /// Unique attempt identifier.
    pub attempt_id: Uuid,
    /// Fingerprint of the graph the attempt ran against.
    pub graph_fingerprint: String,
    /// When `start()` was called.
    pub started_at: Option<DateTime<Utc>>,
    /// Whether the attempt has ended.
    pub finished: bool,
    /// Final (or running) score.
    pub score: u32,
    /// Sum of all question point values in the graph.
    pub max_score: u32,
    /// Seconds accumulated from ticks.
    pub elapsed_seconds: f32,
    /// Why the attempt ended.
    pub finish_reason: Option<FinishReason>,
    /// Per-question outcomes in presentation order.
    pub results: Vec<ResultEntry>,
}

impl QuizSummary {
    /// Number of correctly answered questions.
    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_correct).count()
    }

    /// Fraction of presented questions answered correctly, in [0, 1].
    pub fn accuracy(&self) -> f32 {
        if self.results.is_empty() {
            0.0
        } else {
            self.correct_count() as f32 / self.results.len() as f32
        }
    }

    /// Number of questions that timed out.
    pub fn timed_out_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.answered && r.is_unanswered())
            .count()
    }
}
