//! Best-score persistence.
//!
//! The game only ever needs one durable integer. `ProfileStore` keeps it in
//! a small JSON file next to the first-run "rules seen" flag.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EchoError, Result};

/// Profile file name inside the data directory.
pub const PROFILE_FILE: &str = "profile.json";

/// Application directory name under the platform data/config dirs.
pub const APP_DIR: &str = "echopad";

/// Durable read/write of the best score
pub trait ScoreStore {
    /// Stored best score, 0 when nothing has been stored yet
    fn get(&self) -> Result<u32>;

    /// Replace the stored best score
    fn set(&mut self, score: u32) -> Result<()>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn get(&self) -> Result<u32> {
        (**self).get()
    }

    fn set(&mut self, score: u32) -> Result<()> {
        (**self).set(score)
    }
}

/// In-memory store, lost when the process exits
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<u32>,
    /// Number of successful `set` calls
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a best score
    pub fn with_best(best: u32) -> Self {
        Self {
            best: Some(best),
            writes: 0,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self) -> Result<u32> {
        Ok(self.best.unwrap_or(0))
    }

    fn set(&mut self, score: u32) -> Result<()> {
        self.best = Some(score);
        self.writes += 1;
        Ok(())
    }
}

/// Contents of the profile file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Highest level ever reached at a round end
    pub best_score: u32,

    /// When `best_score` was set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_achieved_at: Option<DateTime<Utc>>,

    /// Whether the first-run rules have been shown
    pub rules_seen: bool,
}

/// JSON-file backed profile
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Use the profile file at `path`. Nothing is read until asked.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Platform default location: `<data_dir>/echopad/profile.json`
    pub fn default_path() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join(PROFILE_FILE))
            .ok_or(EchoError::NoProfileLocation)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the profile. A missing file is a fresh profile, not an error.
    pub fn load(&self) -> Result<Profile> {
        if !self.path.exists() {
            return Ok(Profile::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| EchoError::FileReadError {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Write the profile, creating the parent directory if needed
    pub fn save(&self, profile: &Profile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| EchoError::DirectoryCreateError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let content = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, content).map_err(|e| EchoError::FileWriteError {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }

    pub fn rules_seen(&self) -> Result<bool> {
        Ok(self.load()?.rules_seen)
    }

    pub fn mark_rules_seen(&self) -> Result<()> {
        let mut profile = self.load()?;
        if !profile.rules_seen {
            profile.rules_seen = true;
            self.save(&profile)?;
        }
        Ok(())
    }

    /// Forget the best score but keep the rest of the profile
    pub fn reset_best(&self) -> Result<()> {
        let mut profile = self.load()?;
        profile.best_score = 0;
        profile.best_achieved_at = None;
        self.save(&profile)
    }
}

impl ScoreStore for ProfileStore {
    fn get(&self) -> Result<u32> {
        Ok(self.load()?.best_score)
    }

    fn set(&mut self, score: u32) -> Result<()> {
        let mut profile = self.load()?;
        profile.best_score = score;
        profile.best_achieved_at = Some(Utc::now());
        self.save(&profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_defaults_to_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get().unwrap(), 0);
        store.set(3).unwrap();
        assert_eq!(store.get().unwrap(), 3);
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn test_missing_profile_is_zero() {
        let temp = tempdir().unwrap();
        let store = ProfileStore::open(temp.path().join("profile.json"));
        assert_eq!(store.get().unwrap(), 0);
        assert!(!store.rules_seen().unwrap());
    }

    #[test]
    fn test_set_persists_across_instances() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("profile.json");

        let mut store = ProfileStore::open(&path);
        store.set(9).unwrap();

        let reopened = ProfileStore::open(&path);
        let profile = reopened.load().unwrap();
        assert_eq!(profile.best_score, 9);
        assert!(profile.best_achieved_at.is_some());
    }

    #[test]
    fn test_rules_flag_survives_score_writes() {
        let temp = tempdir().unwrap();
        let mut store = ProfileStore::open(temp.path().join("profile.json"));

        store.mark_rules_seen().unwrap();
        store.set(2).unwrap();

        assert!(store.rules_seen().unwrap());
        assert_eq!(store.get().unwrap(), 2);
    }

    #[test]
    fn test_reset_best_keeps_rules_flag() {
        let temp = tempdir().unwrap();
        let mut store = ProfileStore::open(temp.path().join("profile.json"));
        store.mark_rules_seen().unwrap();
        store.set(5).unwrap();

        store.reset_best().unwrap();

        let profile = store.load().unwrap();
        assert_eq!(profile.best_score, 0);
        assert!(profile.best_achieved_at.is_none());
        assert!(profile.rules_seen);
    }

    #[test]
    fn test_corrupt_profile_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("profile.json");
        fs::write(&path, "not json").unwrap();

        let store = ProfileStore::open(&path);
        let err = store.get().unwrap_err();
        assert_eq!(err.error_code(), "JSON");
    }

    #[test]
    fn test_unknown_and_missing_fields_tolerated() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("profile.json");
        fs::write(&path, r#"{ "best_score": 4, "theme": "dark" }"#).unwrap();

        let profile = ProfileStore::open(&path).load().unwrap();
        assert_eq!(profile.best_score, 4);
        assert!(!profile.rules_seen);
    }
}
