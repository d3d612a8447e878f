//! Per-question result records.

use serde::{Deserialize, Serialize};

use super::node::{NodeId, QuestionNode};

/// Text reported for the chosen answer when none was given.
pub const NO_ANSWER_TEXT: &str = "No Answer";

/// Recorded outcome of one presented question.
///
/// Answers are snapshotted when the question is presented, so later changes
/// to a graph never rewrite history. An entry is opened unanswered and
/// closed exactly once by an answer or a timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    /// Node the question came from.
    pub node_id: NodeId,
    /// Question text.
    pub question_text: String,
    /// Snapshot of the answers.
    pub answers: Vec<String>,
    /// Explanation text.
    pub explanation: String,
    /// Index of the correct answer.
    pub correct_answer_index: usize,
    /// Index of the chosen answer. `None` for no answer or timeout.
    pub chosen_answer_index: Option<usize>,
    /// Whether the chosen answer was correct.
    pub is_correct: bool,
    /// Whether the entry has been closed.
    #[serde(default)]
    pub answered: bool,
}

impl ResultEntry {
    /// Open an unanswered entry for a presented question.
    pub fn open(question: &QuestionNode) -> Self {
        Self {
            node_id: question.id.clone(),
            question_text: question.question_text.clone(),
            answers: question.answers.clone(),
            explanation: question.explanation.clone(),
            correct_answer_index: question.correct_answer_index,
            chosen_answer_index: None,
            is_correct: false,
            answered: false,
        }
    }

    /// Close the entry. Returns `false` if it was already closed.
    pub fn close(&mut self, chosen: Option<usize>, is_correct: bool) -> bool {
        if self.answered {
            return false;
        }
        self.chosen_answer_index = chosen;
        self.is_correct = is_correct;
        self.answered = true;
        true
    }

    /// Whether the question timed out or was left unanswered.
    pub fn is_unanswered(&self) -> bool {
        self.chosen_answer_index.is_none()
    }

    /// Text of the correct answer, or an empty string if the index is out of range.
    pub fn correct_answer_text(&self) -> &str {
        self.answers
            .get(self.correct_answer_index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Text of the chosen answer, or [`NO_ANSWER_TEXT`].
    pub fn chosen_answer_text(&self) -> &str {
        self.chosen_answer_index
            .and_then(|i| self.answers.get(i))
            .map(String::as_str)
            .unwrap_or(NO_ANSWER_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> QuestionNode {
        QuestionNode::new("q1", "2+2?", vec!["3".into(), "4".into()], 1)
            .with_explanation("Basic arithmetic")
    }

    #[test]
    fn test_open_snapshots_question() {
        let entry = ResultEntry::open(&question());
        assert_eq!(entry.question_text, "2+2?");
        assert_eq!(entry.answers, vec!["3", "4"]);
        assert_eq!(entry.explanation, "Basic arithmetic");
        assert!(!entry.answered);
        assert!(entry.is_unanswered());
    }

    #[test]
    fn test_snapshot_survives_source_edit() {
        let mut q = question();
        let entry = ResultEntry::open(&q);
        q.answers[1] = "five".into();
        assert_eq!(entry.correct_answer_text(), "4");
    }

    #[test]
    fn test_close_only_once() {
        let mut entry = ResultEntry::open(&question());
        assert!(entry.close(Some(1), true));
        assert!(!entry.close(Some(0), false));
        assert_eq!(entry.chosen_answer_index, Some(1));
        assert!(entry.is_correct);
    }

    #[test]
    fn test_answer_texts() {
        let mut entry = ResultEntry::open(&question());
        assert_eq!(entry.chosen_answer_text(), NO_ANSWER_TEXT);
        assert_eq!(entry.correct_answer_text(), "4");

        entry.close(Some(0), false);
        assert_eq!(entry.chosen_answer_text(), "3");
    }

    #[test]
    fn test_answer_texts_out_of_range() {
        let mut entry = ResultEntry::open(&QuestionNode::new("q", "?", vec!["a".into()], 5));
        entry.close(Some(3), false);
        assert_eq!(entry.correct_answer_text(), "");
        assert_eq!(entry.chosen_answer_text(), NO_ANSWER_TEXT);
    }
}
