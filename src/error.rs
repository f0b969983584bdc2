use thiserror::Error;

/// Failures at the edges of the drill: files, exports and logging setup.
///
/// The drill loop itself never fails; see `difficulty`, `tracker` and
/// `controller` for the fallbacks used on odd input.
#[derive(Debug, Error)]
pub enum DrillError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid config file: {0}")]
    Config(#[from] serde_json::Error),
    #[error("could not install log subscriber: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, DrillError>;
