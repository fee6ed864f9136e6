//! Durable key-value storage for the session snapshot and the auth flag.
//!
//! The layout mirrors a browser's local storage: one key holds the whole
//! session as JSON text, a second key holds the login flag. Backends only
//! deal in strings; [`Persistence`] owns the encoding.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::PersistError;
use crate::model::SessionState;

pub const SESSION_KEY: &str = "lucky-draw-state";
pub const AUTH_KEY: &str = "authed";

/// String key-value storage.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&self, key: &str) -> Result<(), PersistError>;
    /// Drops every key.
    fn clear(&self) -> Result<(), PersistError>;
}

/// Lets a caller keep a handle on the store it hands to [`Persistence`].
impl<S: KeyValueStore + Sync> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), PersistError> {
        (**self).clear()
    }
}

/// In-process store used by tests and throwaway sessions.
///
/// A `BTreeMap` keeps `keys()` in a stable order.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map.
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.lock().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        self.lock().clear();
        Ok(())
    }
}

/// One file per key under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(key: &str, source: io::Error) -> PersistError {
    PersistError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|err| io_error(key, err))?;
        // Staged write; the rename replaces the old snapshot in one step.
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).map_err(|err| io_error(key, err))?;
        fs::rename(&staging, &path).map_err(|err| io_error(key, err))
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(key, err)),
        }
    }

    fn clear(&self) -> Result<(), PersistError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(io_error("*", err)),
        };
        for entry in entries {
            let path = entry.map_err(|err| io_error("*", err))?.path();
            if path.extension().is_some_and(|ext| ext == "json" || ext == "tmp") {
                fs::remove_file(&path).map_err(|err| io_error("*", err))?;
            }
        }
        Ok(())
    }
}

/// Session and auth-flag encoding on top of a [`KeyValueStore`].
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Loads the saved session.
    ///
    /// A corrupt snapshot is discarded and reported as absent, never as an error.
    pub fn load(&self) -> Result<Option<SessionState>, PersistError> {
        let Some(raw) = self.store.get(SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<SessionState>(&raw) {
            Ok(state) => {
                debug!(
                    participants = state.participants.len(),
                    awards = state.awards.len(),
                    "loaded saved session"
                );
                Ok(Some(state))
            }
            Err(err) => {
                warn!(error = %err, "saved session is corrupt; starting fresh");
                self.store.remove(SESSION_KEY)?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, state: &SessionState) -> Result<(), PersistError> {
        let encoded = serde_json::to_string(state)?;
        self.store.set(SESSION_KEY, &encoded)
    }

    /// Drops the saved session, leaving the auth flag alone.
    pub fn discard(&self) -> Result<(), PersistError> {
        self.store.remove(SESSION_KEY)
    }

    /// Wipes every key, including the auth flag.
    pub fn clear(&self) -> Result<(), PersistError> {
        self.store.clear()
    }

    pub fn is_authed(&self) -> Result<bool, PersistError> {
        Ok(self.store.get(AUTH_KEY)?.as_deref() == Some("true"))
    }

    pub fn set_authed(&self) -> Result<(), PersistError> {
        self.store.set(AUTH_KEY, "true")
    }
}
