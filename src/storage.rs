//! Persistence boundary.
//!
//! The engine never picks a storage medium. Everything it persists (player
//! profile, settings, session history) goes through `KeyValueStore`, which
//! the embedding application implements. Two implementations ship here: an
//! in-memory map and a single JSON file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::error::GameError;
use crate::seeds::AVATARS;
use crate::sessions::SessionRecord;

pub const PROFILE_KEY: &str = "profile";
pub const SETTINGS_KEY: &str = "settings";
pub const SESSIONS_KEY: &str = "sessions";

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("store io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("malformed stored value for '{key}': {source}")]
  Malformed { key: String, source: serde_json::Error },
  #[error("store lock poisoned")]
  Poisoned,
}

impl From<StoreError> for GameError {
  fn from(e: StoreError) -> Self {
    GameError::Storage(e.to_string())
  }
}

/// Minimal string key-value interface the engine persists through.
pub trait KeyValueStore: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
  fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let map = self.map.lock().map_err(|_| StoreError::Poisoned)?;
    Ok(map.get(key).cloned())
  }

  fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
    let mut map = self.map.lock().map_err(|_| StoreError::Poisoned)?;
    map.insert(key.to_string(), value);
    Ok(())
  }
}

/// All keys in one pretty-printed JSON object on disk. The whole file is
/// rewritten (via a sibling temp file) on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
  path: PathBuf,
  map: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
  /// Open `path`, starting empty when the file does not exist yet.
  pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
    let path = path.as_ref().to_path_buf();
    let map = match std::fs::read_to_string(&path) {
      Ok(s) if s.trim().is_empty() => HashMap::new(),
      Ok(s) => serde_json::from_str(&s)
        .map_err(|source| StoreError::Malformed { key: path.display().to_string(), source })?,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
      Err(e) => return Err(e.into()),
    };
    Ok(Self { path, map: Mutex::new(map) })
  }

  fn flush(&self, map: &HashMap<String, String>) -> Result<(), StoreError> {
    let body = serde_json::to_string_pretty(map)
      .map_err(|source| StoreError::Malformed { key: self.path.display().to_string(), source })?;
    let tmp = self.path.with_extension("tmp");
    std::fs::write(&tmp, body)?;
    std::fs::rename(&tmp, &self.path)?;
    Ok(())
  }
}

impl KeyValueStore for JsonFileStore {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let map = self.map.lock().map_err(|_| StoreError::Poisoned)?;
    Ok(map.get(key).cloned())
  }

  fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
    let mut map = self.map.lock().map_err(|_| StoreError::Poisoned)?;
    map.insert(key.to_string(), value);
    self.flush(&map)
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
  pub name: String,
  pub age: Option<u8>,
  pub avatar: String,
}

impl Default for Profile {
  fn default() -> Self {
    Self { name: String::new(), age: None, avatar: AVATARS[0].to_string() }
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
  #[default]
  En,
  Es,
  Fr,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
  #[serde(default)]
  pub language: Language,
  #[serde(default)]
  pub dark_mode: bool,
}

fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, StoreError> {
  match store.get(key)? {
    Some(raw) => serde_json::from_str(&raw)
      .map(Some)
      .map_err(|source| StoreError::Malformed { key: key.to_string(), source }),
    None => Ok(None),
  }
}

fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError> {
  let raw = serde_json::to_string(value).map_err(|source| StoreError::Malformed { key: key.to_string(), source })?;
  store.set(key, raw)
}

pub fn load_profile(store: &dyn KeyValueStore) -> Result<Profile, StoreError> {
  Ok(load_json(store, PROFILE_KEY)?.unwrap_or_default())
}

pub fn save_profile(store: &dyn KeyValueStore, profile: &Profile) -> Result<(), StoreError> {
  save_json(store, PROFILE_KEY, profile)
}

pub fn load_settings(store: &dyn KeyValueStore) -> Result<Settings, StoreError> {
  Ok(load_json(store, SETTINGS_KEY)?.unwrap_or_default())
}

pub fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> Result<(), StoreError> {
  save_json(store, SETTINGS_KEY, settings)
}

pub fn load_sessions(store: &dyn KeyValueStore) -> Result<Vec<SessionRecord>, StoreError> {
  Ok(load_json(store, SESSIONS_KEY)?.unwrap_or_default())
}

/// Read-modify-write of the stored history. Callers serialize appends.
#[instrument(level = "debug", skip(store, record), fields(game = %record.game_type))]
pub fn append_session(store: &dyn KeyValueStore, record: &SessionRecord) -> Result<usize, StoreError> {
  let mut history = load_sessions(store)?;
  history.push(record.clone());
  save_json(store, SESSIONS_KEY, &history)?;
  debug!(target: "storage", stored = history.len(), "Session appended to store");
  Ok(history.len())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::GameType;
  use crate::scoring::ScoreState;
  use chrono::Utc;

  fn record(game_type: GameType) -> SessionRecord {
    SessionRecord { game_type, score: ScoreState { correct: 2, total: 4 }.summary(), completed_at: Utc::now() }
  }

  #[test]
  fn defaults_when_nothing_stored() {
    let store = MemoryStore::new();
    assert_eq!(load_profile(&store).unwrap(), Profile::default());
    assert_eq!(load_settings(&store).unwrap(), Settings::default());
    assert!(load_sessions(&store).unwrap().is_empty());
  }

  #[test]
  fn profile_and_settings_round_trip() {
    let store = MemoryStore::new();
    let profile = Profile { name: "Mia".into(), age: Some(7), avatar: "🦄".into() };
    save_profile(&store, &profile).unwrap();
    save_settings(&store, &Settings { language: Language::Fr, dark_mode: true }).unwrap();
    assert_eq!(load_profile(&store).unwrap(), profile);
    assert_eq!(load_settings(&store).unwrap().language, Language::Fr);
  }

  #[test]
  fn malformed_value_is_reported() {
    let store = MemoryStore::new();
    store.set(PROFILE_KEY, "{not json".into()).unwrap();
    assert!(matches!(load_profile(&store), Err(StoreError::Malformed { ref key, .. }) if key == PROFILE_KEY));
  }

  #[test]
  fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    {
      let store = JsonFileStore::open(&path).unwrap();
      append_session(&store, &record(GameType::Memory)).unwrap();
      assert_eq!(append_session(&store, &record(GameType::Path)).unwrap(), 2);
    }
    let store = JsonFileStore::open(&path).unwrap();
    let history = load_sessions(&store).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].game_type, GameType::Memory);
    assert_eq!(history[1].game_type, GameType::Path);
  }
}
