//! Settings persisted in a TOML file.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use nbruff_host::{HostError, Settings, SettingsStore};
use tracing::debug;

/// A [`SettingsStore`] backed by a TOML file.
///
/// A missing file reads as the default settings.
#[derive(Debug, Clone)]
pub struct TomlSettings {
    path: PathBuf,
}

impl TomlSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for TomlSettings {
    async fn load(&self) -> Result<Settings, HostError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No settings file at {}", self.path.display());
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(HostError::settings(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        toml::from_str(&text).map_err(|e| {
            HostError::settings(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, settings: &Settings) -> Result<(), HostError> {
        let text = toml::to_string(settings)
            .map_err(|e| HostError::settings(format!("Failed to serialize settings: {}", e)))?;
        tokio::fs::write(&self.path, text).await.map_err(|e| {
            HostError::settings(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}
