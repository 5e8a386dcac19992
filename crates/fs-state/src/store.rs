//! On-disk save store and autosave sink

use std::path::{Path, PathBuf};

use fs_slot_lab::{GameConfig, GameState, StateSink};

use crate::error::{SaveError, SaveResult};
use crate::snapshot::SaveSnapshot;

const APP_DIR: &str = "FruitSpin";
const SAVE_FILE: &str = "save.json";

/// A single save slot backed by a JSON file
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
    config: GameConfig,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, GameConfig::default())
    }

    /// Store whose loads normalize against `config`
    pub fn with_config(path: impl Into<PathBuf>, config: GameConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// `<data dir>/FruitSpin/save.json`
    pub fn default_location() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(SAVE_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the session. Returns false (and writes nothing) mid-round.
    pub fn save(&self, state: &GameState) -> SaveResult<bool> {
        let Some(snapshot) = SaveSnapshot::capture(state) else {
            log::debug!("Save skipped: round in flight");
            return Ok(false);
        };
        write_snapshot(&self.path, &snapshot)?;
        log::debug!("Saved session to {:?}", self.path);
        Ok(true)
    }

    /// Read the saved session, if one exists
    pub fn load(&self) -> SaveResult<Option<GameState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let state = self.read_state(&self.path)?;
        log::info!("Loaded session from {:?}", self.path);
        Ok(Some(state))
    }

    /// Remove the save file. A missing file is not an error.
    pub fn clear(&self) -> SaveResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Cleared save {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a pretty-printed copy of the session to `path`
    pub fn export_to(&self, state: &GameState, path: &Path) -> SaveResult<()> {
        let snapshot = SaveSnapshot::capture(state)
            .ok_or_else(|| SaveError::Invalid("cannot export while a round is in flight".into()))?;
        write_snapshot(path, &snapshot)?;
        log::info!("Exported session to {:?}", path);
        Ok(())
    }

    /// Read a session exported with [`SaveStore::export_to`]
    pub fn import_from(&self, path: &Path) -> SaveResult<GameState> {
        let state = self.read_state(path).inspect_err(|e| {
            log::warn!("Import from {:?} rejected: {}", path, e);
        })?;
        log::info!("Imported session from {:?}", path);
        Ok(state)
    }

    fn read_state(&self, path: &Path) -> SaveResult<GameState> {
        let json = std::fs::read_to_string(path)?;
        let snapshot = SaveSnapshot::from_json(&json, &self.config)?;
        Ok(snapshot.into_state(&self.config))
    }
}

impl StateSink for SaveStore {
    fn persist(&mut self, state: &GameState) {
        if let Err(e) = self.save(state) {
            log::warn!("Autosave to {:?} failed: {}", self.path, e);
        }
    }
}

fn write_snapshot(path: &Path, snapshot: &SaveSnapshot) -> SaveResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, snapshot.to_json()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_slot_lab::Phase;
    use tempfile::TempDir;

    #[test]
    fn test_default_location() {
        let path = SaveStore::default_location();
        assert!(path.ends_with("FruitSpin/save.json"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path().join("save.json"));
        assert!(store.load().unwrap().is_none());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path().join("nested").join("save.json"));

        let mut state = GameState::default();
        state.credits = 1234;
        assert!(store.save(&state).unwrap());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.credits, 1234);

        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_skipped_mid_round() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path().join("save.json"));

        let mut state = GameState::default();
        state.phase = Phase::Spinning;
        assert!(!store.save(&state).unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("save.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = SaveStore::new(&path);
        assert!(matches!(store.load(), Err(SaveError::Parse(_))));
    }

    #[test]
    fn test_sink_swallows_failures() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the write fail
        let path = dir.path().join("save.json");
        std::fs::create_dir_all(&path).unwrap();

        let mut store = SaveStore::new(&path);
        store.persist(&GameState::default());
    }
}
