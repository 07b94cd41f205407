//! User configuration.
//!
//! Optional JSON file; every field has a default so a partial (or missing)
//! file is fine:
//!
//! ```json
//! {
//!   "timing": { "show_ms": 400, "gap_ms": 300, "feedback_ms": 200, "advance_delay_ms": 1000 },
//!   "keys": { "q": "red", "w": "blue", "a": "green", "s": "orange" },
//!   "profile_path": "/home/me/.echopad.json"
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::controller::KeyMap;
use crate::error::{EchoError, Result};
use crate::game::{Symbol, Timing};
use crate::store::APP_DIR;

/// Config file name inside the config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Echopad configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timing: Timing,

    /// Key → pad bindings, one character per key
    pub keys: BTreeMap<String, Symbol>,

    /// Where the profile (best score) lives; platform data dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let keys = KeyMap::default()
            .iter()
            .map(|(key, symbol)| (key.to_string(), symbol))
            .collect();
        Self {
            timing: Timing::default(),
            keys,
            profile_path: None,
        }
    }
}

impl Config {
    /// Platform default location: `<config_dir>/echopad/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| EchoError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), otherwise the default file
    /// if present, otherwise defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.timing.show_ms == 0 {
            return Err(EchoError::InvalidConfig {
                reason: "timing.show_ms must be greater than 0".to_string(),
            });
        }
        self.key_map().map(|_| ())
    }

    /// Parse the `keys` table into a [`KeyMap`]. Every pad needs a key.
    pub fn key_map(&self) -> Result<KeyMap> {
        let mut pairs = Vec::with_capacity(self.keys.len());
        for (key, symbol) in &self.keys {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => pairs.push((c, *symbol)),
                _ => {
                    return Err(EchoError::InvalidConfig {
                        reason: format!("key '{}' must be a single character", key),
                    })
                }
            }
        }
        let keys = KeyMap::from_pairs(pairs)?;

        if let Some(symbol) = Symbol::ALL.into_iter().find(|s| keys.key_for(*s).is_none()) {
            return Err(EchoError::InvalidConfig {
                reason: format!("pad {} has no key", symbol),
            });
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timing, Timing::default());
        assert_eq!(config.key_map().unwrap(), KeyMap::default());
        assert!(config.profile_path.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{ "timing": { "gap_ms": 150 } }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.timing.gap_ms, 150);
        assert_eq!(config.timing.show_ms, 400);
        assert_eq!(config.key_map().unwrap(), KeyMap::default());
    }

    #[test]
    fn test_custom_keys() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{ "keys": { "1": "red", "2": "blue", "3": "green", "4": "orange" } }"#,
        )
        .unwrap();

        let keys = Config::load(&path).unwrap().key_map().unwrap();
        assert_eq!(keys.lookup('3'), Some(Symbol::Green));
        assert_eq!(keys.lookup('q'), None);
    }

    #[test]
    fn test_multi_char_key_rejected() {
        let mut config = Config::default();
        config.keys.insert("qq".to_string(), Symbol::Red);
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_unbound_pad_rejected() {
        let mut config = Config::default();
        config.keys.remove("s");
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(err.to_string().contains("ORANGE"));
    }

    #[test]
    fn test_zero_show_time_rejected() {
        let mut config = Config::default();
        config.timing.show_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope.json");
        let err = Config::resolve(Some(&missing)).unwrap_err();
        assert_eq!(err.error_code(), "FILE_READ");
    }
}
