use crate::difficulty::DifficultyLevel;
use crate::error::Result;
use crate::time_series::TimeSeriesPoint;
use crate::util::{mean, percent, round_to};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::io;

/// A single answered question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub difficulty: DifficultyLevel,
    pub correct: bool,
    /// Seconds between showing the puzzle and the submission.
    pub time_taken: f64,
}

impl Attempt {
    pub fn new(difficulty: DifficultyLevel, correct: bool, time_taken: f64) -> Self {
        Self {
            difficulty,
            correct,
            time_taken,
        }
    }
}

/// Whole-session aggregates, derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SessionMetrics {
    pub total_attempts: usize,
    pub accuracy_percent: f64,
    pub average_response_time: f64,
}

/// One line of the session export, with statistics running up to this attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportRow {
    pub index: usize,
    pub difficulty: DifficultyLevel,
    pub correct: bool,
    pub time_taken: f64,
    pub running_accuracy: f64,
    pub running_avg_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyAccuracy {
    pub difficulty: DifficultyLevel,
    pub attempts: usize,
    pub accuracy_percent: f64,
}

pub const CSV_HEADER: [&str; 6] = [
    "Question Index",
    "Difficulty",
    "Answer Correct",
    "Time Taken (s)",
    "Running Accuracy (%)",
    "Running Avg Time (s)",
];

/// Append-only attempt log for one session.
#[derive(Debug, Clone, Default)]
pub struct PerformanceTracker {
    history: Vec<Attempt>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer. Durations are stored as given, negative ones included.
    pub fn log_attempt(&mut self, difficulty: DifficultyLevel, correct: bool, time_taken: f64) {
        if time_taken < 0.0 {
            tracing::debug!(time_taken, "logging attempt with negative duration");
        }
        self.history
            .push(Attempt::new(difficulty, correct, time_taken));
        tracing::debug!(
            %difficulty,
            correct,
            time_taken,
            total = self.history.len(),
            "attempt logged"
        );
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// The last `n` attempts, oldest first.
    pub fn recent_history(&self, n: usize) -> &[Attempt] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    pub fn metrics(&self) -> SessionMetrics {
        if self.history.is_empty() {
            return SessionMetrics::default();
        }
        let total = self.history.len();
        let correct = self.history.iter().filter(|a| a.correct).count();
        let times: Vec<f64> = self.history.iter().map(|a| a.time_taken).collect();

        SessionMetrics {
            total_attempts: total,
            accuracy_percent: percent(correct, total),
            average_response_time: mean(&times).unwrap_or(0.0),
        }
    }

    /// Rows for the session export, running statistics computed in one pass.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        let mut correct_so_far = 0;
        let mut time_so_far = 0.0;

        self.history
            .iter()
            .enumerate()
            .map(|(i, attempt)| {
                let count = i + 1;
                if attempt.correct {
                    correct_so_far += 1;
                }
                time_so_far += attempt.time_taken;

                ExportRow {
                    index: count,
                    difficulty: attempt.difficulty,
                    correct: attempt.correct,
                    time_taken: round_to(attempt.time_taken, 2),
                    running_accuracy: round_to(percent(correct_so_far, count), 1),
                    running_avg_time: round_to(time_so_far / count as f64, 2),
                }
            })
            .collect()
    }

    /// Accuracy per tier, in tier order, skipping tiers with no attempts.
    pub fn accuracy_by_difficulty(&self) -> Vec<DifficultyAccuracy> {
        let groups = self.history.iter().into_group_map_by(|a| a.difficulty);

        DifficultyLevel::ALL
            .iter()
            .filter_map(|level| {
                let attempts = groups.get(level)?;
                let correct = attempts.iter().filter(|a| a.correct).count();
                Some(DifficultyAccuracy {
                    difficulty: *level,
                    attempts: attempts.len(),
                    accuracy_percent: percent(correct, attempts.len()),
                })
            })
            .collect()
    }

    pub fn response_times(&self) -> Vec<TimeSeriesPoint> {
        self.history
            .iter()
            .enumerate()
            .map(|(i, a)| TimeSeriesPoint::new((i + 1) as f64, a.time_taken))
            .collect()
    }

    /// Write the export as CSV. An empty log writes nothing, not even a header.
    ///
    /// Columns have a fixed width: times always carry two decimals (`1.00`, not
    /// `1.0`) and running accuracy one (`66.7`). Values are rounded ties-to-even
    /// before formatting.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        if self.history.is_empty() {
            return Ok(());
        }

        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(CSV_HEADER)?;
        for row in self.export_rows() {
            wtr.write_record([
                row.index.to_string(),
                row.difficulty.to_string(),
                if row.correct { "True" } else { "False" }.to_string(),
                format!("{:.2}", row.time_taken),
                format!("{:.1}", row.running_accuracy),
                format!("{:.2}", row.running_avg_time),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
