use std::{fs, path::PathBuf, sync::RwLock};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// Tunables for the stopwatch tick loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StopwatchSettings {
    /// Accumulator tick cadence in milliseconds. Smaller values mean
    /// smoother observers at higher tick overhead; final accumulated
    /// time is correct either way.
    pub tick_interval_ms: u64,
    /// Publish a snapshot every N ticks (1 = every tick), for hosts that
    /// want fine-grained accounting but a slower UI refresh.
    pub publish_every_ticks: u32,
}

impl Default for StopwatchSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
            publish_every_ticks: 1,
        }
    }
}

/// JSON-file-backed settings store. A missing or malformed file falls
/// back to defaults; updates are persisted immediately.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<StopwatchSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Malformed settings in {}: {err}; using defaults",
                    path.display()
                );
                StopwatchSettings::default()
            })
        } else {
            StopwatchSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn current(&self) -> StopwatchSettings {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, settings: StopwatchSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            *guard = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &StopwatchSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("splitwatch-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = scratch_path("missing");
        let _ = fs::remove_file(&path);

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.current(), StopwatchSettings::default());
    }

    #[test]
    fn update_persists_and_reloads() {
        let path = scratch_path("roundtrip");
        let _ = fs::remove_file(&path);

        let store = SettingsStore::new(path.clone()).unwrap();
        let settings = StopwatchSettings {
            tick_interval_ms: 50,
            publish_every_ticks: 4,
        };
        store.update(settings.clone()).unwrap();

        let reloaded = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(reloaded.current(), settings);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = scratch_path("malformed");
        fs::write(&path, "{not json").unwrap();

        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.current(), StopwatchSettings::default());

        let _ = fs::remove_file(&path);
    }
}
