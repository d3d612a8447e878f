//! Lifecycle events emitted by the traversal engine.

use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::result::ResultEntry;

/// Observable event over the lifetime of one quiz attempt.
///
/// Events are delivered synchronously in the order they occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QuizEvent {
    /// A question became current and awaits an answer.
    QuestionPresented {
        /// Node being presented.
        node_id: NodeId,
        /// Question text.
        text: String,
        /// Answers in port order.
        answers: Vec<String>,
    },
    /// The armed timer advanced.
    TimerUpdated {
        /// Seconds left on the current question.
        remaining_seconds: f32,
    },
    /// The armed timer reached zero.
    TimeExpired,
    /// The attempt ended.
    QuizFinished {
        /// Final score.
        score: u32,
        /// Seconds elapsed since `start()`.
        elapsed_seconds: f32,
    },
    /// Full result log of the finished attempt.
    ResultsReady {
        /// One entry per presented question.
        results: Vec<ResultEntry>,
    },
}

impl QuizEvent {
    /// Event name as used in structured logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::QuestionPresented { .. } => "question_presented",
            Self::TimerUpdated { .. } => "timer_updated",
            Self::TimeExpired => "time_expired",
            Self::QuizFinished { .. } => "quiz_finished",
            Self::ResultsReady { .. } => "results_ready",
        }
    }
}
