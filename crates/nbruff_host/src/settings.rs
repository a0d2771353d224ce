//! Persisted host settings.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::HostError;

/// User settings controlling automatic formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// Format a code cell when it is scheduled for execution.
    pub format_on_run: bool,
    /// Format a document when it is being saved.
    pub format_on_save: bool,
    /// Sort imports before formatting.
    pub sort_imports: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format_on_run: false,
            format_on_save: false,
            sort_imports: true,
        }
    }
}

/// A boolean setting that can be toggled by command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    FormatOnRun,
    FormatOnSave,
    SortImports,
}

impl Setting {
    /// The persisted key.
    pub fn key(self) -> &'static str {
        match self {
            Setting::FormatOnRun => "format-on-run",
            Setting::FormatOnSave => "format-on-save",
            Setting::SortImports => "sort-imports",
        }
    }
}

impl Settings {
    pub fn get(&self, setting: Setting) -> bool {
        match setting {
            Setting::FormatOnRun => self.format_on_run,
            Setting::FormatOnSave => self.format_on_save,
            Setting::SortImports => self.sort_imports,
        }
    }

    /// Flips `setting` and returns its new value.
    pub fn toggle(&mut self, setting: Setting) -> bool {
        let slot = match setting {
            Setting::FormatOnRun => &mut self.format_on_run,
            Setting::FormatOnSave => &mut self.format_on_save,
            Setting::SortImports => &mut self.sort_imports,
        };
        *slot = !*slot;
        *slot
    }
}

/// Where settings are persisted between sessions.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Loads the stored settings, or the defaults when none are stored.
    async fn load(&self) -> Result<Settings, HostError>;

    /// Persists `settings`.
    async fn save(&self, settings: &Settings) -> Result<(), HostError>;
}

/// Settings kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySettings {
    settings: Mutex<Settings>,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }

    /// The last saved settings.
    pub fn current(&self) -> Settings {
        *self.settings.lock()
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn load(&self) -> Result<Settings, HostError> {
        Ok(self.current())
    }

    async fn save(&self, settings: &Settings) -> Result<(), HostError> {
        *self.settings.lock() = *settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert!(!settings.format_on_run);
        assert!(!settings.format_on_save);
        assert!(settings.sort_imports);
    }

    #[test]
    fn test_kebab_case_keys_with_defaults() {
        let settings: Settings = toml::from_str("format-on-save = true").unwrap();

        assert_eq!(
            settings,
            Settings {
                format_on_save: true,
                ..Settings::default()
            }
        );
    }

    #[rstest]
    #[case::run(Setting::FormatOnRun, true)]
    #[case::save(Setting::FormatOnSave, true)]
    #[case::sort(Setting::SortImports, false)]
    fn test_toggle(#[case] setting: Setting, #[case] expected: bool) {
        let mut settings = Settings::default();

        assert_eq!(settings.toggle(setting), expected);
        assert_eq!(settings.get(setting), expected);
        assert_eq!(settings.toggle(setting), !expected);
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySettings::default();
        let mut settings = store.load().await.unwrap();
        settings.toggle(Setting::FormatOnRun);

        store.save(&settings).await.unwrap();

        assert!(store.current().format_on_run);
    }
}
