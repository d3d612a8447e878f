//! Append-only result ledger for one quiz attempt.

use crate::types::ResultEntry;

/// Ordered log of per-question outcomes.
///
/// Entries are never removed during an attempt; only a fresh start clears
/// the ledger.
#[derive(Debug, Clone, Default)]
pub struct ResultLedger {
    entries: Vec<ResultEntry>,
}

impl ResultLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all entries for a new attempt.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append a freshly opened entry.
    pub fn open(&mut self, entry: ResultEntry) {
        self.entries.push(entry);
    }

    /// Close the most recent entry.
    ///
    /// Returns `None` when the ledger is empty or the last entry is already
    /// closed; closed entries are never rewritten.
    pub fn close_last(&mut self, chosen: Option<usize>, is_correct: bool) -> Option<&ResultEntry> {
        let last = self.entries.last_mut()?;
        if last.close(chosen, is_correct) {
            Some(last)
        } else {
            None
        }
    }

    /// The open entry, if the last one has not been closed yet.
    pub fn pending(&self) -> Option<&ResultEntry> {
        self.entries.last().filter(|e| !e.answered)
    }

    /// All entries in presentation order.
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    /// Owned copy of the whole log for reporting.
    pub fn snapshot(&self) -> Vec<ResultEntry> {
        self.entries.clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of correctly answered entries.
    pub fn correct_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_correct).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionNode;

    fn entry(id: &str) -> ResultEntry {
        ResultEntry::open(&QuestionNode::new(id, "?", vec!["a".into(), "b".into()], 0))
    }

    #[test]
    fn test_close_last_fills_most_recent() {
        let mut ledger = ResultLedger::new();
        ledger.open(entry("q1"));
        ledger.close_last(Some(0), true);
        ledger.open(entry("q2"));

        let closed = ledger.close_last(Some(1), false).unwrap();
        assert_eq!(closed.node_id.as_str(), "q2");
        assert_eq!(ledger.correct_count(), 1);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_close_last_never_rewrites() {
        let mut ledger = ResultLedger::new();
        assert!(ledger.close_last(Some(0), true).is_none());

        ledger.open(entry("q1"));
        assert!(ledger.pending().is_some());
        assert!(ledger.close_last(None, false).is_some());
        assert!(ledger.pending().is_none());
        assert!(ledger.close_last(Some(0), true).is_none());
        assert!(ledger.entries()[0].is_unanswered());
    }

    #[test]
    fn test_clear_and_snapshot() {
        let mut ledger = ResultLedger::new();
        ledger.open(entry("q1"));
        let snapshot = ledger.snapshot();
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(snapshot.len(), 1);
    }
}
