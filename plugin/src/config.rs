use std::path::{Path, PathBuf};

use clansort_shared::SortSettings;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when persisting sort settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to write settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence for the user's sort preferences.
pub trait ConfigStore {
    /// Current settings. Unreadable storage yields defaults.
    fn load(&self) -> SortSettings;

    fn save(&mut self, settings: &SortSettings) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    settings: SortSettings,
}

impl MemoryConfigStore {
    pub fn new(settings: SortSettings) -> Self {
        Self { settings }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> SortSettings {
        self.settings
    }

    fn save(&mut self, settings: &SortSettings) -> Result<(), ConfigError> {
        self.settings = *settings;
        Ok(())
    }
}

/// Settings stored as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    path: PathBuf,
}

impl JsonFileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileConfigStore {
    fn load(&self) -> SortSettings {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved sort settings, using defaults");
                return SortSettings::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read sort settings");
                return SortSettings::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring corrupt sort settings");
            SortSettings::default()
        })
    }

    fn save(&mut self, settings: &SortSettings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;

        Ok(())
    }
}
