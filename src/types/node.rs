//! Node types for the quiz graph.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

use super::edge::{answer_port, FALSE_PORT, TRUE_PORT};

/// Unique identifier for a node in the quiz graph.
///
/// Authoring tools emit GUID strings, but any non-empty string is accepted.
/// Implements `Ord` so graph iteration order is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new NodeId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// 2-D authoring position. Carried through for round-trip fidelity only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal canvas coordinate.
    pub x: f32,
    /// Vertical canvas coordinate.
    pub y: f32,
}

impl Position {
    /// Create a new position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Difficulty label of a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    /// Easy question.
    #[default]
    Easy,
    /// Medium question.
    Medium,
    /// Hard question.
    Hard,
}

impl Difficulty {
    /// Parse difficulty from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Parse difficulty from the authoring tool's integer level.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Easy),
            1 => Some(Self::Medium),
            2 => Some(Self::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "Easy"),
            Self::Medium => write!(f, "Medium"),
            Self::Hard => write!(f, "Hard"),
        }
    }
}

/// Accepted wire forms of [`Difficulty`]: a name or an integer level.
#[derive(Deserialize)]
#[serde(untagged)]
enum DifficultyRepr {
    Name(String),
    Level(u8),
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match DifficultyRepr::deserialize(deserializer)? {
            DifficultyRepr::Name(name) => Self::from_str(&name)
                .ok_or_else(|| de::Error::custom(format!("unknown difficulty: {name}"))),
            DifficultyRepr::Level(level) => Self::from_level(level)
                .ok_or_else(|| de::Error::custom(format!("unknown difficulty level: {level}"))),
        }
    }
}

/// The quiz entry point. Exposes a single output port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartNode {
    /// Unique node identifier.
    #[serde(alias = "GUID")]
    pub id: NodeId,
    /// Authoring position.
    #[serde(default, alias = "Position")]
    pub position: Position,
}

impl StartNode {
    /// Create a start node at the origin.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            position: Position::default(),
        }
    }
}

/// Question payload shared by multiple-choice and true/false nodes.
///
/// Field names follow the serialized graph format; the authoring tool's
/// legacy PascalCase names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionNode {
    /// Unique node identifier.
    #[serde(alias = "GUID")]
    pub id: NodeId,
    /// Question shown to the player.
    #[serde(alias = "QuestionText")]
    pub question_text: String,
    /// Answers in port order.
    #[serde(default, alias = "Answers")]
    pub answers: Vec<String>,
    /// Index into `answers` of the correct answer.
    #[serde(alias = "CorrectAnswerIndex")]
    pub correct_answer_index: usize,
    /// Free-form category label.
    #[serde(default, alias = "Category")]
    pub category: String,
    /// Difficulty label.
    #[serde(default, alias = "DifficultyLevel")]
    pub difficulty: Difficulty,
    /// Time limit in seconds. Zero or negative means unlimited.
    #[serde(default, alias = "TimeLimit")]
    pub time_limit: f32,
    /// Points awarded for a correct answer.
    #[serde(default, alias = "PointValue")]
    pub point_value: u32,
    /// Explanation shown in the results summary.
    #[serde(default, alias = "Explanation")]
    pub explanation: String,
    /// Authoring position.
    #[serde(default, alias = "Position")]
    pub position: Position,
}

impl QuestionNode {
    /// Create an untimed question worth no points.
    pub fn new(
        id: impl Into<NodeId>,
        question_text: impl Into<String>,
        answers: Vec<String>,
        correct_answer_index: usize,
    ) -> Self {
        Self {
            id: id.into(),
            question_text: question_text.into(),
            answers,
            correct_answer_index,
            category: String::new(),
            difficulty: Difficulty::default(),
            time_limit: 0.0,
            point_value: 0,
            explanation: String::new(),
            position: Position::default(),
        }
    }

    /// Set the point value.
    pub fn with_points(mut self, points: u32) -> Self {
        self.point_value = points;
        self
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f32) -> Self {
        self.time_limit = seconds;
        self
    }

    /// Set the explanation text.
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Set category and difficulty.
    pub fn with_category(mut self, category: impl Into<String>, difficulty: Difficulty) -> Self {
        self.category = category.into();
        self.difficulty = difficulty;
        self
    }

    /// Whether this question has a positive time limit.
    pub fn is_timed(&self) -> bool {
        self.time_limit > 0.0
    }
}

/// A vertex of the quiz graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Entry point of the quiz.
    Start(StartNode),
    /// Question with N answers, ports `"Answer 1"` … `"Answer N"`.
    MultipleChoice(QuestionNode),
    /// Question with ports `"True"` and `"False"`.
    TrueFalse(QuestionNode),
}

impl Node {
    /// Build a multiple-choice node.
    pub fn multiple_choice(question: QuestionNode) -> Self {
        Self::MultipleChoice(question)
    }

    /// Build a true/false node. Empty answers default to `["True", "False"]`.
    pub fn true_false(mut question: QuestionNode) -> Self {
        if question.answers.is_empty() {
            question.answers = vec![TRUE_PORT.to_string(), FALSE_PORT.to_string()];
        }
        Self::TrueFalse(question)
    }

    /// Node identifier.
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Start(start) => &start.id,
            Self::MultipleChoice(q) | Self::TrueFalse(q) => &q.id,
        }
    }

    /// Authoring position.
    pub fn position(&self) -> Position {
        match self {
            Self::Start(start) => start.position,
            Self::MultipleChoice(q) | Self::TrueFalse(q) => q.position,
        }
    }

    /// Question payload, if this node asks one.
    pub fn question(&self) -> Option<&QuestionNode> {
        match self {
            Self::Start(_) => None,
            Self::MultipleChoice(q) | Self::TrueFalse(q) => Some(q),
        }
    }

    /// Whether this is the start node.
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start(_))
    }

    /// Short variant name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::MultipleChoice(_) => "multiple_choice",
            Self::TrueFalse(_) => "true_false",
        }
    }

    /// Output port that a choice of `chosen` routes through.
    ///
    /// `None` means the node has no port semantics and routing follows its
    /// first outgoing edge.
    pub fn expected_port(&self, chosen: usize) -> Option<String> {
        match self {
            Self::Start(_) => None,
            Self::MultipleChoice(_) => Some(answer_port(chosen)),
            Self::TrueFalse(_) => {
                let port = if chosen == 0 { TRUE_PORT } else { FALSE_PORT };
                Some(port.to_string())
            }
        }
    }

    /// Whether `chosen` is the correct answer for this node.
    pub fn is_correct(&self, chosen: usize) -> bool {
        match self {
            Self::Start(_) => false,
            Self::MultipleChoice(q) | Self::TrueFalse(q) => chosen == q.correct_answer_index,
        }
    }

    /// Points this node is worth when answered correctly.
    pub fn point_value(&self) -> u32 {
        self.question().map_or(0, |q| q.point_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mc() -> Node {
        Node::multiple_choice(QuestionNode::new(
            "q1",
            "2+2?",
            vec!["3".into(), "4".into(), "5".into()],
            1,
        ))
    }

    #[test]
    fn test_expected_port_multiple_choice() {
        let node = mc();
        assert_eq!(node.expected_port(0).as_deref(), Some("Answer 1"));
        assert_eq!(node.expected_port(2).as_deref(), Some("Answer 3"));
    }

    #[test]
    fn test_expected_port_true_false() {
        let node = Node::true_false(QuestionNode::new("tf", "Sky is blue", vec![], 0));
        assert_eq!(node.expected_port(0).as_deref(), Some("True"));
        assert_eq!(node.expected_port(1).as_deref(), Some("False"));
        // Anything other than 0 is treated as "False".
        assert_eq!(node.expected_port(7).as_deref(), Some("False"));
    }

    #[test]
    fn test_start_has_no_port_semantics() {
        let node = Node::Start(StartNode::new("start"));
        assert_eq!(node.expected_port(0), None);
        assert!(!node.is_correct(0));
        assert_eq!(node.point_value(), 0);
    }

    #[test]
    fn test_true_false_default_answers() {
        let node = Node::true_false(QuestionNode::new("tf", "?", vec![], 1));
        assert_eq!(node.question().unwrap().answers, vec!["True", "False"]);
    }

    #[test]
    fn test_is_correct() {
        let node = mc();
        assert!(node.is_correct(1));
        assert!(!node.is_correct(0));
    }

    #[test]
    fn test_difficulty_accepts_names_and_levels() {
        let by_name: Difficulty = serde_json::from_str("\"Hard\"").unwrap();
        assert_eq!(by_name, Difficulty::Hard);

        let by_level: Difficulty = serde_json::from_str("1").unwrap();
        assert_eq!(by_level, Difficulty::Medium);

        assert!(serde_json::from_str::<Difficulty>("9").is_err());
        assert!(serde_json::from_str::<Difficulty>("\"brutal\"").is_err());
    }

    #[test]
    fn test_question_accepts_legacy_field_names() {
        let json = r#"{
            "GUID": "abc",
            "QuestionText": "Capital of France?",
            "Answers": ["Paris", "Rome"],
            "CorrectAnswerIndex": 0,
            "DifficultyLevel": 2,
            "TimeLimit": 10.0,
            "PointValue": 3,
            "Position": {"x": 1.0, "y": 2.0}
        }"#;

        let q: QuestionNode = serde_json::from_str(json).unwrap();
        assert_eq!(q.id.as_str(), "abc");
        assert_eq!(q.difficulty, Difficulty::Hard);
        assert_eq!(q.point_value, 3);
        assert!(q.is_timed());
        assert_eq!(q.position, Position::new(1.0, 2.0));
    }

    #[test]
    fn test_kind_name_matches_serde_tag() {
        let nodes = [
            Node::Start(StartNode::new("s")),
            Node::multiple_choice(QuestionNode::new("m", "?", vec!["a".into()], 0)),
            Node::true_false(QuestionNode::new("t", "?", vec![], 0)),
        ];
        for node in nodes {
            let json = serde_json::to_value(&node).unwrap();
            assert_eq!(json["kind"], node.kind_name());
        }
    }
}
