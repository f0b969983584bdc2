// Library surface: the adaptive drill core plus the TUI pieces main.rs wires up.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod difficulty;
pub mod error;
pub mod logging;
pub mod puzzle;
pub mod runtime;
pub mod session;
pub mod time_series;
pub mod tracker;
pub mod ui;
pub mod util;

pub use controller::{next_difficulty, next_difficulty_from_name};
pub use difficulty::DifficultyLevel;
pub use error::{DrillError, Result};
pub use puzzle::{Operator, Puzzle, PuzzleGenerator};
pub use session::{Feedback, Session};
pub use tracker::{Attempt, ExportRow, PerformanceTracker, SessionMetrics};
