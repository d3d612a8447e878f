//! Property tests for routing, timing and scoring.

use std::sync::Arc;

use proptest::prelude::*;
use quiz_kernel::{
    answer_port, Edge, EngineState, Node, NodeId, QuestionNode, QuizGraph, RecordingSink,
    StartNode, TraversalEngine, NO_ANSWER_TEXT,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Start → MC with `answers` answers; only ports listed in `wired` have edges,
/// each leading to its own leaf.
fn fan_out(answers: usize, wired: &[bool]) -> Arc<QuizGraph> {
    let labels: Vec<String> = (0..answers).map(|i| format!("choice {i}")).collect();
    let mut nodes = vec![
        Node::Start(StartNode::new("start")),
        Node::multiple_choice(QuestionNode::new("root", "pick", labels, 0).with_points(1)),
    ];
    let mut edges = vec![Edge::to_input("start", "Next", "root")];

    for (i, &has_edge) in wired.iter().enumerate().take(answers) {
        if has_edge {
            let leaf = format!("leaf{i}");
            nodes.push(Node::true_false(QuestionNode::new(leaf.as_str(), "leaf", vec![], 0)));
            edges.push(Edge::to_input("root", answer_port(i), leaf.as_str()));
        }
    }

    Arc::new(QuizGraph::new(nodes, edges).unwrap())
}

/// Start → a timed true/false question followed by an untimed one.
fn timed_chain(limit: f32) -> Arc<QuizGraph> {
    Arc::new(
        QuizGraph::new(
            vec![
                Node::Start(StartNode::new("start")),
                Node::true_false(QuestionNode::new("timed", "t", vec![], 1).with_time_limit(limit)),
                Node::true_false(QuestionNode::new("after", "a", vec![], 0)),
            ],
            vec![
                Edge::to_input("start", "Next", "timed"),
                Edge::to_input("timed", "True", "after"),
            ],
        )
        .unwrap(),
    )
}

fn assert_timed_out_once(
    engine: &TraversalEngine<Arc<RecordingSink>>,
    sink: &RecordingSink,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(sink.count("time_expired"), 1);
    prop_assert_eq!(engine.current_node(), Some(&NodeId::from("after")));
    prop_assert_eq!(engine.results().len(), 2);
    prop_assert_eq!(engine.results()[0].chosen_answer_text(), NO_ANSWER_TEXT);
    prop_assert!(!engine.results()[0].is_correct);
    Ok(())
}

fn answers_strategy() -> impl Strategy<Value = (usize, Vec<bool>, usize)> {
    (1usize..8).prop_flat_map(|n| (Just(n), prop::collection::vec(any::<bool>(), n), 0..n))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn answer_routes_to_matching_port_or_ends((n, wired, choice) in answers_strategy()) {
        let mut engine = TraversalEngine::without_events(fan_out(n, &wired));
        engine.start();

        let state = engine.submit_answer(choice).unwrap();
        if wired[choice] {
            prop_assert_eq!(state, EngineState::AwaitingAnswer(NodeId::new(format!("leaf{choice}"))));
        } else {
            prop_assert_eq!(state, EngineState::Finished);
        }
    }

    #[test]
    fn timeout_fires_once_however_delta_is_split(
        limit in 0.5f32..10.0,
        splits in prop::collection::vec(0.01f32..1.0, 1..20),
        overshoot in any::<bool>(),
    ) {
        let sink = Arc::new(RecordingSink::new());
        let mut engine = TraversalEngine::new(timed_chain(limit), Arc::clone(&sink));
        engine.start();

        // Scale the splits so they sum to the limit, or past it.
        let target = if overshoot { limit * 1.5 } else { limit };
        let total: f32 = splits.iter().sum();
        let scale = target / total;
        for delta in &splits {
            let _ = engine.tick(delta * scale);
        }

        assert_timed_out_once(&engine, &sink)?;
    }

    #[test]
    fn timeout_fires_once_for_equal_frames(limit in 0.5f32..10.0, frames in 1u32..240) {
        let sink = Arc::new(RecordingSink::new());
        let mut engine = TraversalEngine::new(timed_chain(limit), Arc::clone(&sink));
        engine.start();

        let delta = limit / frames as f32;
        for _ in 0..frames {
            engine.tick(delta).unwrap();
        }

        assert_timed_out_once(&engine, &sink)?;
    }

    #[test]
    fn score_never_decreases(answers in prop::collection::vec(0usize..2, 1..12)) {
        // Two questions looping into each other; every answer is routed.
        let graph = Arc::new(QuizGraph::new(
            vec![
                Node::Start(StartNode::new("start")),
                Node::true_false(QuestionNode::new("a", "a", vec![], 0).with_points(3)),
                Node::true_false(QuestionNode::new("b", "b", vec![], 1).with_points(5)),
            ],
            vec![
                Edge::to_input("start", "Next", "a"),
                Edge::to_input("a", "True", "b"),
                Edge::to_input("a", "False", "b"),
                Edge::to_input("b", "True", "a"),
                Edge::to_input("b", "False", "a"),
            ],
        ).unwrap());

        let mut engine = TraversalEngine::without_events(graph);
        engine.start();

        let mut last = 0;
        for answer in answers {
            let before = engine.score();
            let node = engine.current_node().cloned().unwrap();
            engine.submit_answer(answer).unwrap();
            let gained = engine.score() - before;
            prop_assert!(engine.score() >= last);
            prop_assert!(gained == 0 || gained == 3 || gained == 5);
            if gained > 0 {
                let expected = if node.as_str() == "a" { 3 } else { 5 };
                prop_assert_eq!(gained, expected);
            }
            last = engine.score();
        }
        prop_assert!(engine.score() <= 8);
    }
}
