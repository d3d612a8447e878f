//! Core types for the quiz kernel.

pub mod node;
pub mod edge;
pub mod result;
pub mod event;
pub mod summary;

pub use node::{NodeId, Node, StartNode, QuestionNode, Difficulty, Position};
pub use edge::{Edge, answer_port, TRUE_PORT, FALSE_PORT};
pub use result::{ResultEntry, NO_ANSWER_TEXT};
pub use event::QuizEvent;
pub use summary::{QuizSummary, FinishReason};
