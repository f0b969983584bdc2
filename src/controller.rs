//! Adaptive difficulty rule.
//!
//! Looks at the last three answers: all correct and faster than the tier's
//! expected time moves up one tier; two or more wrong, or averaging at least
//! 1.5x the expected time, moves down one tier. Promotion is checked first.

use crate::difficulty::DifficultyLevel;
use crate::tracker::Attempt;
use crate::util::mean;

/// Number of most recent attempts the rule considers.
pub const DECISION_WINDOW: usize = 3;
/// Multiple of the expected time at which answers count as too slow.
pub const SLOW_FACTOR: f64 = 1.5;
const DEMOTE_AT_INCORRECT: usize = 2;

/// What the rule decided, before clamping to the tier range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Promote,
    Demote,
    Hold,
    InsufficientData,
}

/// Classify the most recent attempts against the expectations of `current`.
pub fn evaluate(current: DifficultyLevel, recent: &[Attempt]) -> Adjustment {
    if recent.len() < DECISION_WINDOW {
        return Adjustment::InsufficientData;
    }

    let window = &recent[recent.len() - DECISION_WINDOW..];
    let correct = window.iter().filter(|a| a.correct).count();
    let incorrect = DECISION_WINDOW - correct;
    let times: Vec<f64> = window.iter().map(|a| a.time_taken).collect();
    let avg_time = mean(&times).unwrap_or(0.0);
    let expected = current.expected_time();

    if correct == DECISION_WINDOW && avg_time < expected {
        Adjustment::Promote
    } else if incorrect >= DEMOTE_AT_INCORRECT || avg_time >= SLOW_FACTOR * expected {
        Adjustment::Demote
    } else {
        Adjustment::Hold
    }
}

pub fn next_difficulty(current: DifficultyLevel, recent: &[Attempt]) -> DifficultyLevel {
    let adjustment = evaluate(current, recent);
    let next = match adjustment {
        Adjustment::Promote => current.harder(),
        Adjustment::Demote => current.easier(),
        Adjustment::Hold | Adjustment::InsufficientData => current,
    };
    tracing::debug!(
        %current,
        %next,
        ?adjustment,
        window = recent.len(),
        "difficulty decision"
    );
    next
}

/// Name-based entry point. Unknown names reset to `Easy` regardless of history.
pub fn next_difficulty_from_name(current: &str, recent: &[Attempt]) -> DifficultyLevel {
    match DifficultyLevel::from_name(current) {
        Some(level) => next_difficulty(level, recent),
        None => {
            tracing::debug!(current, "unknown difficulty, resetting to Easy");
            DifficultyLevel::Easy
        }
    }
}
