//! Persistence of the query and user preferences.
//!
//! Storage is a plain string key-value store behind the [`KeyValueStore`]
//! trait. [`FileStore`] keeps all keys in one JSON file; [`MemoryStore`] is
//! used in tests. [`QueryStore`] layers the Querysmith keys on top:
//!
//! | Key            | Contents                                          |
//! |----------------|---------------------------------------------------|
//! | `searchQuery`  | JSON array of the editable query parts            |
//! | `activePreset` | id of the applied preset                          |
//! | `theme`        | `light` or `dark`                                 |
//! | `language`     | `en` or `tr`                                      |
//!
//! ## State File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "updated_at": "2026-01-01T12:00:00Z",
//!   "entries": { "theme": "dark", "searchQuery": "[...]" }
//! }
//! ```
//!
//! Reading never fails hard: a missing or corrupt file yields an empty store
//! and a corrupt query yields the default single blank part.

use crate::catalog::Catalog;
use crate::composer::Composer;
use crate::error::{QuerysmithError, Result};
use crate::ids::IdGenerator;
use crate::locale::{Language, Theme};
use crate::types::{PartId, PresetTemplate, QueryPart};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Key holding the editable query parts
pub const QUERY_KEY: &str = "searchQuery";
/// Key holding the active preset id
pub const PRESET_KEY: &str = "activePreset";
/// Key holding the theme preference
pub const THEME_KEY: &str = "theme";
/// Key holding the language preference
pub const LANGUAGE_KEY: &str = "language";

/// Current state file format version
pub const STATE_VERSION: u32 = 1;

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    updated_at: Option<DateTime<Utc>>,
    entries: BTreeMap<String, String>,
}

/// Store backed by a single JSON file, rewritten atomically on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: Mutex<StateFile>,
}

impl FileStore {
    /// File name used inside the data directory
    pub const FILE_NAME: &'static str = "state.json";

    /// Open the store in `data_dir`, starting empty if the file is missing
    /// or unreadable.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let path = data_dir.as_ref().join(Self::FILE_NAME);
        let state = match Self::read_state(&path) {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable state file");
                StateFile::default()
            }
        };

        FileStore {
            path,
            state: Mutex::new(state),
        }
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Delete the state file and forget all keys.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.state.lock();
        *state = StateFile::default();
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn read_state(path: &Path) -> Result<StateFile> {
        if !path.exists() {
            debug!(path = %path.display(), "State file not found, starting empty");
            return Ok(StateFile::default());
        }

        let contents = fs::read_to_string(path)?;
        let state: StateFile =
            serde_json::from_str(&contents).map_err(|e| QuerysmithError::StateCorrupted {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if state.version > STATE_VERSION {
            return Err(QuerysmithError::StateCorrupted {
                path: path.to_path_buf(),
                reason: format!(
                    "unsupported version {} (expected {})",
                    state.version, STATE_VERSION
                ),
            });
        }

        Ok(state)
    }

    fn write_state(&self, state: &mut StateFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        state.version = STATE_VERSION;
        state.updated_at = Some(Utc::now());
        let contents = serde_json::to_string_pretty(state)?;

        // Write to temp, then rename
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), keys = state.entries.len(), "State saved");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.lock().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock();
        if state.entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        state.entries.insert(key.to_string(), value.to_string());
        self.write_state(&mut state)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut state = self.state.lock();
        if state.entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_state(&mut state)
    }
}

/// A query part as written to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPart {
    #[serde(default)]
    id: Option<String>,

    #[serde(rename = "type")]
    kind: String,

    #[serde(default)]
    value: String,

    #[serde(rename = "operatorId", default, skip_serializing_if = "Option::is_none")]
    operator_id: Option<String>,
}

impl From<&QueryPart> for StoredPart {
    fn from(part: &QueryPart) -> Self {
        StoredPart {
            id: Some(part.id.as_str().to_string()),
            kind: if part.is_text() { "text" } else { "operator" }.to_string(),
            value: part.value.clone(),
            operator_id: part.operator_id().map(str::to_string),
        }
    }
}

/// Theme and language, restored with defaults when absent or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
}

/// Querysmith's view of a key-value store.
pub struct QueryStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> QueryStore<S> {
    pub fn new(store: S) -> Self {
        QueryStore { store }
    }

    /// The underlying store
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Write the editable parts and the active preset.
    ///
    /// Failures are logged, never returned: saving must not interrupt
    /// editing.
    pub fn save(&self, composer: &Composer) {
        if let Err(e) = self.try_save(composer) {
            warn!(error = %e, "Failed to save query");
        }
    }

    /// Write the editable parts and the active preset, reporting failures.
    pub fn try_save(&self, composer: &Composer) -> Result<()> {
        let stored: Vec<StoredPart> = composer.editable_parts().map(StoredPart::from).collect();
        if stored.is_empty() {
            self.store.remove(QUERY_KEY)?;
        } else {
            self.store.set(QUERY_KEY, &serde_json::to_string(&stored)?)?;
        }

        match composer.active_preset() {
            Some(id) => self.store.set(PRESET_KEY, id)?,
            None => self.store.remove(PRESET_KEY)?,
        }
        Ok(())
    }

    /// Rebuild the composer from storage.
    ///
    /// Any problem reading the saved query falls back to a single blank
    /// part. Saved operator parts whose operator left the catalog become
    /// text; missing or duplicate ids are replaced.
    pub fn restore(
        &self,
        catalog: &Catalog,
        templates: &[PresetTemplate],
        mut ids: impl IdGenerator + 'static,
    ) -> Composer {
        let parts = match self.load_parts(catalog, &mut ids) {
            Ok(Some(parts)) => parts,
            Ok(None) => {
                debug!("No saved query, starting blank");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable saved query");
                Vec::new()
            }
        };

        let mut composer = Composer::from_parts(parts, ids);

        match self.store.get(PRESET_KEY) {
            Ok(Some(preset)) => composer.apply_template(Some(&preset), templates, catalog),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read active preset"),
        }

        info!(
            parts = composer.len(),
            preset = ?composer.active_preset(),
            "Query restored"
        );
        composer
    }

    fn load_parts(
        &self,
        catalog: &Catalog,
        ids: &mut impl IdGenerator,
    ) -> Result<Option<Vec<QueryPart>>> {
        let Some(raw) = self.store.get(QUERY_KEY)? else {
            return Ok(None);
        };

        let stored: Vec<StoredPart> = serde_json::from_str(&raw)?;
        if stored.is_empty() {
            return Ok(None);
        }

        let mut seen = HashSet::with_capacity(stored.len());
        let parts = stored
            .into_iter()
            .map(|s| {
                let id = match s.id {
                    Some(id) if !id.is_empty() && seen.insert(id.clone()) => PartId(id),
                    _ => ids.next_id("restored"),
                };
                let operator = match s.kind.as_str() {
                    "operator" => s.operator_id.as_deref().and_then(|op| catalog.get(op)),
                    _ => None,
                };
                match operator {
                    Some(op) => QueryPart::operator(id, Arc::clone(op), s.value),
                    None => QueryPart::text(id, s.value),
                }
            })
            .collect();

        Ok(Some(parts))
    }

    /// Read theme and language, using `default_language` when unset.
    pub fn load_preferences(&self, default_language: Language) -> Preferences {
        let theme = self
            .read_parsed::<Theme>(THEME_KEY)
            .unwrap_or_default();
        let language = self
            .read_parsed::<Language>(LANGUAGE_KEY)
            .unwrap_or(default_language);
        Preferences { theme, language }
    }

    /// Write theme and language.
    pub fn save_preferences(&self, prefs: &Preferences) {
        let result = self
            .store
            .set(THEME_KEY, prefs.theme.as_str())
            .and_then(|_| self.store.set(LANGUAGE_KEY, prefs.language.as_str()));
        if let Err(e) = result {
            warn!(error = %e, "Failed to save preferences");
        }
    }

    fn read_parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        match self.store.get(key) {
            Ok(Some(value)) => value.parse().ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read preference");
                None
            }
        }
    }
}
