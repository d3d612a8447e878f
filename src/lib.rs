//! # quiz-kernel
//!
//! Traversal engine for branching, timed quizzes authored as graphs.
//!
//! The kernel answers one question:
//!
//! > Given the player's answer (or a timeout), **which question comes next**?
//!
//! ## Core Contract
//!
//! 1. Load a quiz graph once; it is read-only for every attempt played on it
//! 2. Walk it node by node, routing each answer through a named output port
//! 3. Score answers, enforce time limits, and hand back a per-question result log
//!
//! ## Architecture
//!
//! ```text
//! QuizDocument (JSON) → QuizGraph → TraversalEngine → EventSink
//!                                        ↓
//!                          QuestionTimer + ResultLedger → QuizSummary
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same graph + same sequence of answers and ticks → identical result log
//! - Port resolution scans outgoing edges in authoring order; first match wins
//! - The engine reads no wall clock; time only advances through `tick`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod canonical;
pub mod graph;
pub mod loader;
pub mod timer;
pub mod ledger;
pub mod events;
pub mod engine;

// Re-exports
pub use types::{
    NodeId, Node, StartNode, QuestionNode, Difficulty, Position,
    Edge, answer_port, TRUE_PORT, FALSE_PORT,
    ResultEntry, NO_ANSWER_TEXT,
    QuizEvent, QuizSummary, FinishReason,
};
pub use graph::{QuizGraph, GraphError};
pub use loader::{QuizDocument, LoadError};
pub use timer::{QuestionTimer, TimerTick};
pub use ledger::ResultLedger;
pub use events::{EventSink, NoOpSink, RecordingSink, TracingSink};
pub use engine::{TraversalEngine, EngineState, EngineError, TIMEOUT_ROUTE_INDEX};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

/// Schema version of the serialized graph and summary types.
/// Increment on breaking changes to any schema type.
pub const QUIZ_SCHEMA_VERSION: &str = "1.0.0";
