//! Event sinks.
//!
//! The traversal engine reports its lifecycle through an [`EventSink`].
//! Delivery is synchronous: `emit` runs before the engine call returns,
//! in the order the events occur.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::QuizEvent;

/// Receiver of engine lifecycle events.
pub trait EventSink {
    /// Deliver one event.
    fn emit(&self, event: &QuizEvent);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: &QuizEvent) {
        (**self).emit(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn emit(&self, event: &QuizEvent) {
        (**self).emit(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&self, event: &QuizEvent) {
        (**self).emit(event)
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn emit(&self, _event: &QuizEvent) {
        // No-op
    }
}

/// Sink that mirrors events into the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &QuizEvent) {
        match event {
            QuizEvent::QuestionPresented { node_id, text, answers } => tracing::info!(
                event = event.name(),
                node_id = %node_id,
                answers = answers.len(),
                "{}",
                text
            ),
            QuizEvent::TimerUpdated { remaining_seconds } => tracing::trace!(
                event = event.name(),
                remaining_seconds = *remaining_seconds,
                "timer updated"
            ),
            QuizEvent::TimeExpired => tracing::info!(event = event.name(), "time expired"),
            QuizEvent::QuizFinished { score, elapsed_seconds } => tracing::info!(
                event = event.name(),
                score = *score,
                elapsed_seconds = *elapsed_seconds,
                "quiz finished"
            ),
            QuizEvent::ResultsReady { results } => tracing::info!(
                event = event.name(),
                questions = results.len(),
                correct = results.iter().filter(|r| r.is_correct).count(),
                "results ready"
            ),
        }
    }
}

/// In-memory sink for tests and hosts that poll.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<QuizEvent>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far.
    pub fn events(&self) -> Vec<QuizEvent> {
        self.events.lock().clone()
    }

    /// Remove and return every event received so far.
    pub fn drain(&self) -> Vec<QuizEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of received events with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.events.lock().iter().filter(|e| e.name() == name).count()
    }

    /// Names of all received events in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(QuizEvent::name).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &QuizEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.emit(&QuizEvent::TimerUpdated { remaining_seconds: 0.0 });
        sink.emit(&QuizEvent::TimeExpired);

        assert_eq!(sink.names(), vec!["timer_updated", "time_expired"]);
        assert_eq!(sink.count("time_expired"), 1);
    }

    #[test]
    fn test_shared_sink_through_arc() {
        let sink = Arc::new(RecordingSink::new());
        let shared: Arc<RecordingSink> = Arc::clone(&sink);
        shared.emit(&QuizEvent::TimeExpired);

        assert_eq!(sink.drain().len(), 1);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_noop_sink() {
        NoOpSink.emit(&QuizEvent::TimeExpired);
        TracingSink.emit(&QuizEvent::TimeExpired);
    }
}
