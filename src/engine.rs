//! Quiz traversal engine.
//!
//! Walks a [`QuizGraph`] one question at a time, driven entirely by host
//! calls: [`TraversalEngine::submit_answer`] from the UI and
//! [`TraversalEngine::tick`] from the host loop.
//!
//! ## State Machine
//!
//! ```text
//! NotStarted --start()--> AwaitingAnswer(node)
//! AwaitingAnswer --answer/timeout, edge found--> AwaitingAnswer(next)
//! AwaitingAnswer --answer/timeout, no edge--> Finished
//! ```
//!
//! `start()` may be called from any state to begin a fresh attempt.
//!
//! ## Edge Resolution
//!
//! The answer index is turned into an expected port name (`"Answer i+1"`
//! for multiple choice, `"True"`/`"False"` for true/false) and the first
//! outgoing edge in authoring order with that source port wins. No match
//! ends the quiz. A timeout routes as if index 0 had been chosen.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::{EventSink, NoOpSink};
use crate::graph::QuizGraph;
use crate::ledger::ResultLedger;
use crate::timer::{QuestionTimer, TimerTick};
use crate::types::{
    Edge, FinishReason, Node, NodeId, QuestionNode, QuizEvent, QuizSummary, ResultEntry,
};

/// Answer index used for routing when a question times out.
pub const TIMEOUT_ROUTE_INDEX: usize = 0;

/// Error type for engine operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    /// Call made while no question is awaiting an answer.
    #[error("Engine is not running (state: {state})")]
    NotRunning {
        /// State the engine was in.
        state: EngineState,
    },
    /// The current node id is missing from the graph.
    #[error("Current node not found: {0}")]
    UnknownCurrentNode(NodeId),
}

/// Position of the engine in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "node_id", rename_all = "snake_case")]
pub enum EngineState {
    /// `start()` has not been called.
    NotStarted,
    /// A question is presented and waits for an answer or timeout.
    AwaitingAnswer(NodeId),
    /// The attempt is over.
    Finished,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::AwaitingAnswer(id) => write!(f, "awaiting_answer({id})"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// Result of looking up the edge to follow.
enum Resolution<'g> {
    Follow(&'g Edge),
    NoMatch { port: Option<String> },
}

/// Pick the outgoing edge of `node` for answer index `chosen`.
///
/// First match in authoring order wins; duplicate port names resolve to the
/// earliest edge.
fn resolve_edge<'g>(graph: &'g QuizGraph, node: &Node, chosen: usize) -> Resolution<'g> {
    let mut outgoing = graph.outgoing(node.id());
    match node.expected_port(chosen) {
        Some(port) => match outgoing.find(|e| e.source_port == port) {
            Some(edge) => Resolution::Follow(edge),
            None => Resolution::NoMatch { port: Some(port) },
        },
        None => match outgoing.next() {
            Some(edge) => Resolution::Follow(edge),
            None => Resolution::NoMatch { port: None },
        },
    }
}

/// Stateful runner for one quiz attempt over a shared graph.
///
/// Owns its score, ledger and timer exclusively. Many engines may share one
/// `Arc<QuizGraph>`. Calls must be serialized by the caller.
pub struct TraversalEngine<S: EventSink = NoOpSink> {
    graph: Arc<QuizGraph>,
    sink: S,
    state: EngineState,
    timer: QuestionTimer,
    ledger: ResultLedger,
    score: u32,
    /// Nodes that already awarded points this attempt.
    scored: HashSet<NodeId>,
    elapsed: f32,
    finish_reason: Option<FinishReason>,
    attempt_id: Uuid,
    started_at: Option<DateTime<Utc>>,
}

impl TraversalEngine<NoOpSink> {
    /// Create an engine that emits no events.
    pub fn without_events(graph: Arc<QuizGraph>) -> Self {
        Self::new(graph, NoOpSink)
    }
}

impl<S: EventSink> TraversalEngine<S> {
    /// Create an engine in the `NotStarted` state.
    pub fn new(graph: Arc<QuizGraph>, sink: S) -> Self {
        Self {
            graph,
            sink,
            state: EngineState::NotStarted,
            timer: QuestionTimer::new(),
            ledger: ResultLedger::new(),
            score: 0,
            scored: HashSet::new(),
            elapsed: 0.0,
            finish_reason: None,
            attempt_id: Uuid::new_v4(),
            started_at: None,
        }
    }

    /// Begin a fresh attempt.
    ///
    /// Resets score, ledger and timer, then presents the start node's
    /// successor. A start node without outgoing edges finishes immediately
    /// with score 0.
    pub fn start(&mut self) -> EngineState {
        self.timer.disarm();
        self.ledger.clear();
        self.scored.clear();
        self.score = 0;
        self.elapsed = 0.0;
        self.finish_reason = None;
        self.attempt_id = Uuid::new_v4();
        self.started_at = Some(Utc::now());

        let graph = Arc::clone(&self.graph);
        let start_id = graph.start_id();

        tracing::info!(
            attempt_id = %self.attempt_id,
            graph = %graph.fingerprint(),
            questions = graph.num_questions(),
            "quiz attempt started"
        );

        let mut outgoing = graph.outgoing(start_id);
        match outgoing.next() {
            Some(edge) => {
                if outgoing.next().is_some() {
                    tracing::warn!(start = %start_id, "start node has several edges, following the first");
                }
                self.enter(&graph, &edge.target_id);
            }
            None => self.finish(FinishReason::NoSuccessor),
        }

        self.state.clone()
    }

    /// Answer the current question with the zero-based `selected` index.
    ///
    /// Rejected with [`EngineError::NotRunning`] unless a question is
    /// awaiting an answer; a rejected call has no side effects.
    pub fn submit_answer(&mut self, selected: usize) -> Result<EngineState, EngineError> {
        let node_id = self.awaiting()?.clone();
        self.timer.disarm();
        self.resolve_answer(node_id, Some(selected));
        Ok(self.state.clone())
    }

    /// Advance time by `delta_seconds`.
    ///
    /// When the armed timer runs out, the question is closed with no answer
    /// and routing continues through [`TIMEOUT_ROUTE_INDEX`]. Negative and
    /// NaN deltas count as zero.
    pub fn tick(&mut self, delta_seconds: f32) -> Result<EngineState, EngineError> {
        let node_id = self.awaiting()?.clone();
        let delta = delta_seconds.max(0.0);
        self.elapsed += delta;

        match self.timer.advance(delta) {
            TimerTick::Idle => {}
            TimerTick::Running { remaining } => {
                self.sink.emit(&QuizEvent::TimerUpdated {
                    remaining_seconds: remaining,
                });
            }
            TimerTick::Expired => {
                self.sink.emit(&QuizEvent::TimerUpdated {
                    remaining_seconds: 0.0,
                });
                self.sink.emit(&QuizEvent::TimeExpired);
                tracing::info!(node_id = %node_id, "question timed out");
                self.resolve_answer(node_id, None);
            }
        }

        Ok(self.state.clone())
    }

    fn awaiting(&self) -> Result<&NodeId, EngineError> {
        match &self.state {
            EngineState::AwaitingAnswer(id) => Ok(id),
            other => Err(EngineError::NotRunning {
                state: other.clone(),
            }),
        }
    }

    /// Close the open entry, score it, and follow the routed edge.
    fn resolve_answer(&mut self, node_id: NodeId, chosen: Option<usize>) {
        let graph = Arc::clone(&self.graph);
        let Some(node) = graph.node(&node_id) else {
            return self.abort_unknown(node_id);
        };

        let is_correct = chosen.is_some_and(|i| node.is_correct(i));
        if self.ledger.close_last(chosen, is_correct).is_none() {
            tracing::warn!(node_id = %node_id, "no open result entry for answered question");
        }
        if is_correct {
            self.award(node);
        }

        tracing::debug!(
            node_id = %node_id,
            kind = node.kind_name(),
            chosen = ?chosen,
            is_correct = is_correct,
            score = self.score,
            "answer recorded"
        );

        let route = chosen.unwrap_or(TIMEOUT_ROUTE_INDEX);
        match resolve_edge(&graph, node, route) {
            Resolution::Follow(edge) => {
                tracing::debug!(
                    from = %node_id,
                    port = %edge.source_port,
                    to = %edge.target_id,
                    "following edge"
                );
                self.enter(&graph, &edge.target_id);
            }
            Resolution::NoMatch { port } => {
                tracing::debug!(node_id = %node_id, port = ?port, "no matching edge, quiz ends");
                self.finish(FinishReason::NoMatchingEdge { node_id, port });
            }
        }
    }

    fn award(&mut self, node: &Node) {
        if self.scored.insert(node.id().clone()) {
            self.score = self.score.saturating_add(node.point_value());
        } else {
            tracing::debug!(node_id = %node.id(), "node already scored this attempt");
        }
    }

    /// Move to `target`, passing through start nodes until a question is reached.
    fn enter<'g>(&mut self, graph: &'g QuizGraph, target: &'g NodeId) {
        let mut next = target;
        let mut hops = 0usize;

        loop {
            match graph.node(next) {
                None => return self.abort_unknown(next.clone()),
                Some(Node::MultipleChoice(q)) | Some(Node::TrueFalse(q)) => {
                    return self.present(q);
                }
                Some(node @ Node::Start(_)) => {
                    hops += 1;
                    if hops > graph.num_nodes() {
                        tracing::warn!(node_id = %next, "start node pass-through loops, ending attempt");
                        return self.finish(FinishReason::PassThroughLimit {
                            node_id: next.clone(),
                        });
                    }
                    tracing::warn!(node_id = %next, "start node reached mid-run, following its first edge");
                    match resolve_edge(graph, node, TIMEOUT_ROUTE_INDEX) {
                        Resolution::Follow(edge) => next = &edge.target_id,
                        Resolution::NoMatch { port } => {
                            return self.finish(FinishReason::NoMatchingEdge {
                                node_id: next.clone(),
                                port,
                            });
                        }
                    }
                }
            }
        }
    }

    fn present(&mut self, question: &QuestionNode) {
        self.timer.arm(question.time_limit);
        self.ledger.open(ResultEntry::open(question));
        self.state = EngineState::AwaitingAnswer(question.id.clone());

        tracing::debug!(
            node_id = %question.id,
            answers = question.answers.len(),
            time_limit = question.time_limit,
            "question presented"
        );

        self.sink.emit(&QuizEvent::QuestionPresented {
            node_id: question.id.clone(),
            text: question.question_text.clone(),
            answers: question.answers.clone(),
        });
    }

    fn abort_unknown(&mut self, node_id: NodeId) {
        let err = EngineError::UnknownCurrentNode(node_id.clone());
        tracing::error!(error = %err, "ending attempt");
        self.finish(FinishReason::UnknownNode { node_id });
    }

    fn finish(&mut self, reason: FinishReason) {
        self.timer.disarm();
        self.state = EngineState::Finished;

        tracing::info!(
            attempt_id = %self.attempt_id,
            score = self.score,
            elapsed_seconds = self.elapsed,
            questions = self.ledger.len(),
            reason = ?reason,
            "quiz attempt finished"
        );
        self.finish_reason = Some(reason);

        self.sink.emit(&QuizEvent::QuizFinished {
            score: self.score,
            elapsed_seconds: self.elapsed,
        });
        self.sink.emit(&QuizEvent::ResultsReady {
            results: self.ledger.snapshot(),
        });
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Whether the attempt has ended.
    pub fn is_finished(&self) -> bool {
        self.state == EngineState::Finished
    }

    /// Running score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds accumulated from ticks since `start()`.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }

    /// Id of the question awaiting an answer.
    pub fn current_node(&self) -> Option<&NodeId> {
        match &self.state {
            EngineState::AwaitingAnswer(id) => Some(id),
            _ => None,
        }
    }

    /// The question awaiting an answer.
    pub fn current_question(&self) -> Option<&QuestionNode> {
        self.current_node()
            .and_then(|id| self.graph.node(id))
            .and_then(Node::question)
    }

    /// Seconds left on the current question, if it is timed.
    pub fn time_remaining(&self) -> Option<f32> {
        self.timer.remaining()
    }

    /// Result log so far.
    pub fn results(&self) -> &[ResultEntry] {
        self.ledger.entries()
    }

    /// Why the attempt ended, once finished.
    pub fn finish_reason(&self) -> Option<&FinishReason> {
        self.finish_reason.as_ref()
    }

    /// Identifier of the current attempt.
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    /// The graph being traversed.
    pub fn graph(&self) -> &Arc<QuizGraph> {
        &self.graph
    }

    /// The event sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Snapshot of the attempt for reporting.
    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            attempt_id: self.attempt_id,
            graph_fingerprint: self.graph.fingerprint().to_string(),
            started_at: self.started_at,
            finished: self.is_finished(),
            score: self.score,
            max_score: self.graph.total_points(),
            elapsed_seconds: self.elapsed,
            finish_reason: self.finish_reason.clone(),
            results: self.ledger.snapshot(),
        }
    }
}

impl<S: EventSink + fmt::Debug> fmt::Debug for TraversalEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalEngine")
            .field("graph", &self.graph.fingerprint())
            .field("state", &self.state)
            .field("score", &self.score)
            .field("elapsed", &self.elapsed)
            .field("results", &self.ledger.len())
            .field("sink", &self.sink)
            .finish()
    }
}
