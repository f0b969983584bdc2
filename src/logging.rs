use crate::error::{DrillError, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Build the filter from an explicit level, then `RUST_LOG`, then `info`.
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => {
            EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
        }
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    }
}

/// Send tracing output to `log_path`; the terminal belongs to the TUI.
pub fn init(level: Option<&str>, log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| DrillError::Logging(e.to_string()))
}
