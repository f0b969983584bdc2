use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "sumdrill";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        match ProjectDirs::from("", "", APP_NAME) {
            Some(pd) => pd.config_dir().join("config.json"),
            None => PathBuf::from("sumdrill_config.json"),
        }
    }

    /// `$HOME/.local/state/sumdrill`, or the platform data dir without a `HOME`.
    pub fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
        } else if let Some(pd) = ProjectDirs::from("", "", APP_NAME) {
            pd.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".")
        }
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir().join("sumdrill.log")
    }

    pub fn default_export_dir() -> PathBuf {
        Self::state_dir().join("exports")
    }
}
