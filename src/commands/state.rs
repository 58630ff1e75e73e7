//! Persisted studio state: recent events and the last record options.

use crate::record::{HistoryStore, RecordOptions};
use crate::utils::error::StateError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioState {
    #[serde(default)]
    pub recent_events: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_record: Option<RecordOptions>,
}

/// State kept as a pretty JSON file
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file reads as empty state
    pub fn load(&self) -> Result<StudioState, StateError> {
        if !self.path.exists() {
            return Ok(StudioState::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, state: &StudioState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        debug!("State saved to {}", self.path.display());
        Ok(())
    }

    /// Load, modify and save
    pub fn update(&self, change: impl FnOnce(&mut StudioState)) -> Result<(), StateError> {
        let mut state = self.load().unwrap_or_else(|e| {
            warn!("Discarding unreadable state {}: {}", self.path.display(), e);
            StudioState::default()
        });
        change(&mut state);
        self.save(&state)
    }
}

impl HistoryStore for JsonStateStore {
    fn recent_events(&self) -> Vec<String> {
        match self.load() {
            Ok(state) => state.recent_events,
            Err(e) => {
                warn!("Failed to read recent events: {}", e);
                Vec::new()
            }
        }
    }

    fn save_recent_events(&self, events: &[String]) -> Result<(), StateError> {
        self.update(|state| state.recent_events = events.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EventSpec;

    #[test]
    fn test_state_round_trip_keeps_both_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("nested/state.json"));

        assert!(store.recent_events().is_empty());

        store
            .save_recent_events(&["ld_spec".to_string(), "st_spec".to_string()])
            .unwrap();
        store
            .update(|state| {
                state.last_record = Some(RecordOptions {
                    events: vec![EventSpec::new("ld_spec")],
                    core: 1,
                    command: "app.exe".to_string(),
                    arguments: String::new(),
                    timeout_seconds: None,
                    disassemble_enabled: false,
                })
            })
            .unwrap();

        let state = store.load().unwrap();
        assert_eq!(state.recent_events, vec!["ld_spec", "st_spec"]);
        assert_eq!(state.last_record.unwrap().core, 1);
    }
}
