//! Config store - read access to controller-owned state
//!
//! The controller owns and persists this state. The gateway only reads it,
//! and reads it again on every request, so precondition checks always run
//! against the current snapshot.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::StoreConfig;
use crate::error::StoreError;

/// Key of the equalizer domain
pub const EQUALIZER_KEY: &str = "equalizer";

/// Read-only view of controller state, keyed by domain name
pub trait ConfigStore: Send + Sync {
    /// Current value for `key`, or `None` if the domain is not stored
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
}

/// Create a store based on configuration
pub fn create_store(config: &StoreConfig) -> Arc<dyn ConfigStore> {
    match config {
        StoreConfig::File { path } => Arc::new(JsonFileStore::new(path)),
        StoreConfig::Memory => Arc::new(MemoryStore::with_default_presets()),
    }
}

// =============================================================================
// Equalizer view
// =============================================================================

/// Typed view of the `equalizer` domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualizerSnapshot {
    /// Name of the preset currently applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    /// Preset name -> band values (shape owned by the controller)
    #[serde(default)]
    pub presets: BTreeMap<String, Value>,
}

impl EqualizerSnapshot {
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        serde_json::from_value(value)
            .map_err(|e| StoreError::Malformed(format!("{}: {}", EQUALIZER_KEY, e)))
    }

    /// Preset names, sorted
    pub fn preset_names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    pub fn has_preset(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a stock set of ten-band presets
    pub fn with_default_presets() -> Self {
        let store = Self::new();
        store.set(EQUALIZER_KEY, default_equalizer());
        store
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.entries.write().insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.write().remove(key)
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }
}

fn default_equalizer() -> Value {
    let presets: Map<String, Value> = [
        ("Default", [0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        ("Classical", [0, 0, 0, 0, 0, 0, -7, -7, -7, -9]),
        ("Club", [0, 0, 8, 6, 6, 6, 3, 0, 0, 0]),
        ("Dance", [9, 7, 2, 0, 0, -5, -7, -7, 0, 0]),
        ("Pop", [-1, 4, 7, 8, 5, 0, -2, -2, -1, -1]),
        ("Rock", [8, 4, -5, -8, -3, 4, 8, 10, 10, 10]),
    ]
    .into_iter()
    .map(|(name, values)| (name.to_string(), json!({ "values": values, "preAmp": 0 })))
    .collect();

    json!({
        "selected": "Default",
        "presets": presets,
    })
}

// =============================================================================
// JSON file store
// =============================================================================

/// Store backed by the controller's JSON settings file
///
/// The file is read on every lookup; the controller may rewrite it at any time.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let content = std::fs::read_to_string(&self.path)?;
        let root: Value = serde_json::from_str(&content)?;
        match root {
            Value::Object(mut map) => Ok(map.remove(key)),
            _ => Err(StoreError::Malformed(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_memory_store_get_and_set() {
        let store = MemoryStore::new();
        assert_eq!(store.get("equalizer").unwrap(), None);

        store.set("equalizer", json!({"presets": {"a": [1]}}));
        assert_eq!(
            store.get("equalizer").unwrap(),
            Some(json!({"presets": {"a": [1]}}))
        );

        store.remove("equalizer");
        assert_eq!(store.get("equalizer").unwrap(), None);
    }

    #[test]
    fn test_default_presets() {
        let store = MemoryStore::with_default_presets();
        let value = store.get(EQUALIZER_KEY).unwrap().unwrap();
        let snapshot = EqualizerSnapshot::from_value(value).unwrap();

        assert_eq!(snapshot.selected.as_deref(), Some("Default"));
        assert_eq!(
            snapshot.preset_names(),
            vec!["Classical", "Club", "Dance", "Default", "Pop", "Rock"]
        );
    }

    #[test]
    fn test_snapshot_rejects_wrong_shape() {
        let result = EqualizerSnapshot::from_value(json!({"presets": [1, 2, 3]}));
        assert!(matches!(result, Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_file_store_sees_rewrites() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"equalizer": {{"selected": "a", "presets": {{"a": {{}}, "b": {{}}}}}}}}"#
        )
        .unwrap();
        let store = JsonFileStore::new(file.path());
        assert_eq!(store.path(), file.path());

        let first = EqualizerSnapshot::from_value(store.get("equalizer").unwrap().unwrap()).unwrap();
        assert_eq!(first.preset_names(), vec!["a", "b"]);

        std::fs::write(
            file.path(),
            r#"{"equalizer": {"presets": {"c": {}}}}"#,
        )
        .unwrap();
        let second =
            EqualizerSnapshot::from_value(store.get("equalizer").unwrap().unwrap()).unwrap();
        assert_eq!(second.preset_names(), vec!["c"]);
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_file_store_errors() {
        let store = JsonFileStore::new("/nonexistent/remoted/config.json");
        assert!(matches!(store.get("equalizer"), Err(StoreError::Io(_))));

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[1, 2]").unwrap();
        let store = JsonFileStore::new(file.path());
        assert!(matches!(store.get("equalizer"), Err(StoreError::Malformed(_))));

        std::fs::write(file.path(), "{ nope").unwrap();
        assert!(matches!(store.get("equalizer"), Err(StoreError::Parse(_))));
    }
}
