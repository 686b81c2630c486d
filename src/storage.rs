//! Local preference storage.
//!
//! The selector keeps exactly one string value under [`STORAGE_KEY`]. The
//! file store keeps it in a small JSON object so other keys written by
//! neighbouring tools survive a save.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use tracing::warn;

use crate::config::STORAGE_KEY;

/// Synchronous key-value store for the theme preference.
pub trait PreferenceStore: Send {
    /// Stored preference, or `None` when nothing was saved yet.
    fn load(&self) -> io::Result<Option<String>>;
    /// Replace the stored preference.
    fn save(&mut self, theme: &str) -> io::Result<()>;
}

/// JSON-object file store (`{"theme-selector-preference": "dark"}`).
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> io::Result<Map<String, Value>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&text) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "storage file is not a JSON object",
            )),
            Err(e) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        }
    }

    /// Move an unreadable file to `<name>.bak` so a save can start fresh
    /// without losing it.
    fn set_aside_corrupt(&self, reason: &io::Error) -> io::Result<()> {
        let backup = self.path.with_extension("json.bak");
        warn!(
            path = %self.path.display(),
            backup = %backup.display(),
            error = %reason,
            "theme storage file is unreadable; moving it aside"
        );
        std::fs::rename(&self.path, &backup)
    }
}

impl PreferenceStore for FileStore {
    /// The stored key, if it holds a string. Other entries are ignored.
    fn load(&self) -> io::Result<Option<String>> {
        let entries = self.read_entries()?;
        match entries.get(STORAGE_KEY) {
            Some(Value::String(theme)) => Ok(Some(theme.clone())),
            Some(other) => {
                warn!(value = %other, "ignoring non-string theme preference");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn save(&mut self, theme: &str) -> io::Result<()> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                self.set_aside_corrupt(&e)?;
                Map::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(STORAGE_KEY.to_string(), Value::String(theme.to_string()));
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(&entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.path)
    }
}

/// In-process store. Clones share the same slot, which lets tests simulate a
/// page reload by handing a clone to a fresh selector.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(theme: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(theme.to_string()))),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> io::Result<Option<String>> {
        self.slot
            .lock()
            .map(|slot| slot.clone())
            .map_err(|_| io::Error::other("memory store lock poisoned"))
    }

    fn save(&mut self, theme: &str) -> io::Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| io::Error::other("memory store lock poisoned"))?;
        *slot = Some(theme.to_string());
        Ok(())
    }
}
