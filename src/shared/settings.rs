use serde::{Deserialize, Serialize};
use tokio::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::ProjectDirs;
use crate::shared::error::{AppError, AppResult};

/// Default capture period
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
/// Default number of entries kept in the history log
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

const HISTORY_FILE_NAME: &str = "clipboard_history.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineSettings {
    pub capture: CaptureSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub poll_interval_ms: u64,
    pub history_capacity: usize,
    pub start_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageSettings {
    /// Overrides the default `<data dir>/clipboard_history.json`
    pub history_file: Option<PathBuf>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            start_enabled: true,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "dockord", "clipdock")
}

impl EngineSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::System("Failed to determine config directory".to_string()))
    }

    pub async fn load() -> AppResult<Self> {
        let path = Self::get_settings_path()?;
        Self::load_from(&path).await
    }

    /// Missing file means defaults; an unreadable or malformed file is an error
    pub async fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).await
            .map_err(|e| AppError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Validation(format!("Failed to parse settings: {}", e)))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.capture.poll_interval_ms.max(1))
    }

    pub fn history_capacity(&self) -> usize {
        self.capture.history_capacity.max(1)
    }

    /// Location of the history document, `None` when no data directory exists
    pub fn history_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.storage.history_file {
            return Some(path.clone());
        }
        project_dirs().map(|dirs| dirs.data_dir().join(HISTORY_FILE_NAME))
    }
}
