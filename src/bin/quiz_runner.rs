//! Quiz Runner Binary
//!
//! Plays a quiz graph on the console. Questions are printed to stdout and
//! answers are read from stdin as 1-based numbers. The time spent on each
//! prompt is fed through the engine's timer before the answer is submitted,
//! so time limits apply.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `QUIZ_FILE`: Path to the quiz JSON (the first CLI argument takes precedence)
//! - `QUIZ_RESULTS_OUT`: Optional path to write the final summary as JSON
//! - `RUST_LOG`: Log level filter (default: quiz_runner=info,quiz_kernel=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin quiz_runner -- path/to/quiz.json
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quiz_kernel::{
    EngineState, EventSink, QuizEvent, QuizGraph, TracingSink, TraversalEngine,
};

/// Runner settings read from the environment and arguments.
struct RunnerConfig {
    quiz_file: PathBuf,
    results_out: Option<PathBuf>,
    log_format: String,
}

impl RunnerConfig {
    fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let quiz_file = std::env::args()
            .nth(1)
            .or_else(|| std::env::var("QUIZ_FILE").ok())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .ok_or("no quiz file: pass a path or set QUIZ_FILE")?;

        let results_out = std::env::var("QUIZ_RESULTS_OUT")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

        Ok(Self {
            quiz_file,
            results_out,
            log_format,
        })
    }
}

/// Initialize the tracing subscriber with JSON or pretty format.
///
/// Logs go to stderr so they never interleave with the quiz on stdout.
fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quiz_runner=info,quiz_kernel=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .init();
    }
}

/// Prints quiz events for the player and mirrors them into the log.
struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: &QuizEvent) {
        TracingSink.emit(event);

        match event {
            QuizEvent::QuestionPresented { text, answers, .. } => {
                println!();
                println!("{text}");
                for (i, answer) in answers.iter().enumerate() {
                    println!("  {}) {}", i + 1, answer);
                }
            }
            QuizEvent::TimerUpdated { .. } => {}
            QuizEvent::TimeExpired => println!("Time's up!"),
            QuizEvent::QuizFinished {
                score,
                elapsed_seconds,
            } => {
                println!();
                println!("Quiz finished. Score: {score} ({elapsed_seconds:.1}s)");
            }
            QuizEvent::ResultsReady { results } => {
                for (i, r) in results.iter().enumerate() {
                    let mark = if r.is_correct { "correct" } else { "wrong" };
                    println!("{}. {} [{}]", i + 1, r.question_text, mark);
                    println!("   your answer: {}", r.chosen_answer_text());
                    println!("   correct answer: {}", r.correct_answer_text());
                    if !r.explanation.is_empty() {
                        println!("   {}", r.explanation);
                    }
                }
            }
        }
    }
}

fn prompt(engine: &TraversalEngine<ConsoleSink>) -> io::Result<()> {
    let mut stdout = io::stdout();
    match engine.time_remaining() {
        Some(left) => write!(stdout, "answer ({left:.0}s left)> ")?,
        None => write!(stdout, "answer> ")?,
    }
    stdout.flush()
}

/// Map a 1-based console answer to an answer index.
///
/// A question without answers accepts any input as index 0 so the run
/// cannot stall on it.
fn parse_choice(line: &str, answers: usize) -> Option<usize> {
    if answers == 0 {
        return Some(0);
    }
    match line.trim().parse::<usize>() {
        Ok(n) if (1..=answers).contains(&n) => Some(n - 1),
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RunnerConfig::from_env()?;
    init_tracing(&config.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        quiz_file = %config.quiz_file.display(),
        "Starting quiz runner"
    );

    let graph = Arc::new(QuizGraph::load_from_path(&config.quiz_file)?);
    let mut engine = TraversalEngine::new(graph, ConsoleSink);
    engine.start();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let EngineState::AwaitingAnswer(_) = engine.state() {
        prompt(&engine)?;
        let shown_at = Instant::now();

        let Some(line) = lines.next() else {
            warn!("stdin closed before the quiz finished");
            break;
        };
        let line = line?;

        // Charge the time spent at the prompt before accepting the answer.
        let before = engine.results().len();
        engine.tick(shown_at.elapsed().as_secs_f32())?;
        let expired = engine.results().len() != before
            || engine.results().last().is_some_and(|r| r.answered);
        if expired {
            continue;
        }

        let answers = engine.current_question().map_or(0, |q| q.answers.len());
        if answers == 0 {
            warn!("question has no answers, skipping");
        }
        match parse_choice(&line, answers) {
            Some(index) => {
                engine.submit_answer(index)?;
            }
            None => println!("Enter a number between 1 and {answers}."),
        }
    }

    let summary = engine.summary();
    info!(
        score = summary.score,
        max_score = summary.max_score,
        accuracy = summary.accuracy(),
        "Quiz runner finished"
    );

    if let Some(path) = &config.results_out {
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        info!(path = %path.display(), "Summary written");
    }

    Ok(())
}
