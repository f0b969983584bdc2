use crate::controller::{next_difficulty, DECISION_WINDOW};
use crate::difficulty::DifficultyLevel;
use crate::puzzle::{Puzzle, PuzzleGenerator};
use crate::tracker::PerformanceTracker;
use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::Rng;

/// How many recent attempts are handed to the difficulty rule by default.
pub const DEFAULT_RECENT_WINDOW: usize = 5;

/// Result of one submitted answer, shown before the next puzzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub correct: bool,
    pub time_taken: f64,
    pub expected_answer: i64,
    pub previous_difficulty: DifficultyLevel,
    pub next_difficulty: DifficultyLevel,
}

impl Feedback {
    pub fn level_changed(&self) -> bool {
        self.previous_difficulty != self.next_difficulty
    }
}

/// Parse a typed answer. Blank or non-numeric input is not a submission.
pub fn parse_answer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// State of one drill session: its attempt log, current tier and pending puzzle.
#[derive(Debug)]
pub struct Session<R: Rng = StdRng> {
    user_name: String,
    started_at: DateTime<Local>,
    difficulty: DifficultyLevel,
    tracker: PerformanceTracker,
    generator: PuzzleGenerator<R>,
    current_puzzle: Option<Puzzle>,
    last_feedback: Option<Feedback>,
    recent_window: usize,
}

impl<R: Rng> Session<R> {
    pub fn new(
        user_name: impl Into<String>,
        start_difficulty: DifficultyLevel,
        generator: PuzzleGenerator<R>,
    ) -> Self {
        let user_name = user_name.into();
        tracing::info!(user = %user_name, difficulty = %start_difficulty, "session started");
        Self {
            user_name,
            started_at: Local::now(),
            difficulty: start_difficulty,
            tracker: PerformanceTracker::new(),
            generator,
            current_puzzle: None,
            last_feedback: None,
            recent_window: DEFAULT_RECENT_WINDOW,
        }
    }

    /// Size of the history slice passed to the difficulty rule. Never below
    /// the rule's own decision window.
    pub fn with_recent_window(mut self, recent_window: usize) -> Self {
        self.recent_window = recent_window.max(DECISION_WINDOW);
        self
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    pub fn tracker(&self) -> &PerformanceTracker {
        &self.tracker
    }

    pub fn recent_window(&self) -> usize {
        self.recent_window
    }

    pub fn has_pending_puzzle(&self) -> bool {
        self.current_puzzle.is_some()
    }

    /// The puzzle awaiting an answer, generated at the current tier if none is pending.
    pub fn current_puzzle(&mut self) -> &Puzzle {
        let difficulty = self.difficulty;
        let generator = &mut self.generator;
        self.current_puzzle
            .get_or_insert_with(|| generator.generate(difficulty))
    }

    pub fn peek_puzzle(&self) -> Option<&Puzzle> {
        self.current_puzzle.as_ref()
    }

    /// Grade `raw` against the pending puzzle, log it and adapt the tier.
    ///
    /// Returns `None` without touching any state when `raw` is not a number
    /// or no puzzle is pending.
    pub fn submit_answer(&mut self, raw: &str, time_taken: f64) -> Option<Feedback> {
        let answer = parse_answer(raw)?;
        let puzzle = self.current_puzzle.take()?;

        let correct = puzzle.is_correct(answer);
        self.tracker
            .log_attempt(puzzle.difficulty(), correct, time_taken);

        let previous = self.difficulty;
        self.difficulty = next_difficulty(previous, self.tracker.recent_history(self.recent_window));

        let feedback = Feedback {
            correct,
            time_taken,
            expected_answer: puzzle.answer(),
            previous_difficulty: previous,
            next_difficulty: self.difficulty,
        };
        if feedback.level_changed() {
            tracing::info!(from = %previous, to = %self.difficulty, "difficulty changed");
        }
        self.last_feedback = Some(feedback);
        Some(feedback)
    }

    /// Feedback from the most recent submission, kept until the next one.
    pub fn last_feedback(&self) -> Option<&Feedback> {
        self.last_feedback.as_ref()
    }
}
