use std::{
    cell::RefCell,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smart_default::SmartDefault;
use thiserror::Error;

/// Key the grid settings are stored under by hosts with a key-value storage.
pub const STORAGE_KEY: &str = "anicheck-config";

/// Grid settings that survive restarts.
#[derive(SmartDefault, Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Config {
    #[default(4)]
    #[serde(rename = "rowAmount")]
    pub columns_per_row: usize,
    #[default(750.)]
    #[serde(rename = "unitWidth")]
    pub cell_width: f32,
    #[default(691.)]
    #[serde(rename = "unitHeight")]
    pub cell_height: f32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config storage is not accessible: {0}")]
    Io(#[from] io::Error),
    #[error("config is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the config lives between sessions.
pub trait ConfigStore {
    /// Returns the stored text, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>, ConfigError>;

    fn save(&mut self, data: &str) -> Result<(), ConfigError>;
}

impl Config {
    /// Reads the stored config over the defaults. Every field that is missing
    /// or unusable keeps its default, and nothing here ever fails.
    pub fn load(store: &dyn ConfigStore) -> Config {
        match store.load() {
            Ok(Some(text)) => Self::merge(&text),
            Ok(None) => Config::default(),
            Err(e) => {
                log::warn!("Failed to load config, using defaults: {e}");
                Config::default()
            }
        }
    }

    /// Parses `text` and lays the values it has over the defaults.
    pub fn merge(text: &str) -> Config {
        let mut config = Config::default();

        let stored: Map<String, Value> = match serde_json::from_str(text) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Failed to parse stored config, using defaults: {e}");
                return config;
            }
        };

        if let Some(value) = stored.get("rowAmount") {
            match value.as_u64().filter(|v| *v >= 1) {
                Some(columns) => config.columns_per_row = columns as usize,
                None => log::warn!("Ignoring stored rowAmount {value}"),
            }
        }

        let dimension = |key: &str, default: f32| match stored.get(key) {
            None => default,
            Some(value) => match value.as_f64().map(|v| v as f32) {
                Some(v) if v.is_finite() && v > 0. => v,
                _ => {
                    log::warn!("Ignoring stored {key} {value}");
                    default
                }
            },
        };

        config.cell_width = dimension("unitWidth", config.cell_width);
        config.cell_height = dimension("unitHeight", config.cell_height);
        config
    }

    pub fn save(&self, store: &mut dyn ConfigStore) -> Result<(), ConfigError> {
        let text = serde_json::to_string(self)?;
        store.save(&text)
    }
}

/// Keeps the config in a json file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>, ConfigError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, data: &str) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// An in-memory store. Clones share the same contents, so a caller can
/// keep a handle and look at what the inspector saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            data: Rc::new(RefCell::new(Some(text.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.data.borrow().clone()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, ConfigError> {
        Ok(self.data.borrow().clone())
    }

    fn save(&mut self, data: &str) -> Result<(), ConfigError> {
        *self.data.borrow_mut() = Some(data.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.columns_per_row, 4);
        assert_eq!(config.cell_width, 750.);
        assert_eq!(config.cell_height, 691.);
    }

    #[test]
    fn test_stored_values_override_defaults() {
        let config = Config::merge(r#"{ "rowAmount": 2, "unitHeight": 300 }"#);
        assert_eq!(config.columns_per_row, 2);
        assert_eq!(config.cell_width, 750.);
        assert_eq!(config.cell_height, 300.);
    }

    #[test]
    fn test_unusable_values_keep_defaults() {
        let config = Config::merge(r#"{ "rowAmount": 0, "unitWidth": "wide", "unitHeight": -4 }"#);
        assert_eq!(config, Config::default());

        assert_eq!(Config::merge("not json at all"), Config::default());
        assert_eq!(Config::merge("[1, 2]"), Config::default());
    }

    #[test]
    fn test_save_then_load_through_memory_store() {
        let store = MemoryStore::default();
        assert_eq!(Config::load(&store), Config::default());

        let config = Config {
            columns_per_row: 3,
            cell_width: 400.,
            cell_height: 200.,
        };
        config.save(&mut store.clone()).unwrap();

        let text = store.contents().unwrap();
        assert!(text.contains("\"rowAmount\":3"));
        assert_eq!(Config::load(&store), config);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = std::env::temp_dir().join(format!("anicheck-config-test-{}", std::process::id()));
        let mut store = JsonFileStore::new(dir.join("config.json"));
        assert!(store.load().unwrap().is_none());

        store.save(r#"{"rowAmount":6}"#).unwrap();
        assert_eq!(Config::load(&store).columns_per_row, 6);

        fs::remove_dir_all(dir).unwrap();
    }
}
