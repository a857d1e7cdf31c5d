//! Native-shell key/value store.
//!
//! Mirrors the shell's settings store: `set` stages a JSON value in memory,
//! `save` persists every staged value. A stored JSON `null` is
//! indistinguishable from a missing key.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::storage::{StoreError, write_atomically};

/// The native shell's persistent key/value store.
pub trait NativeStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn save(&self) -> Result<(), StoreError>;
}

/// Store persisted as one JSON object on disk (the shell's `settings.json`).
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RefCell<Map<String, Value>>,
    dirty: Cell<bool>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing entries.
    ///
    /// A missing file yields an empty store; the file is created on the
    /// first [`NativeStore::save`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Map::new(),
            Ok(text) => match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => map,
                other => {
                    return Err(StoreError::Backend(format!(
                        "{} does not hold a JSON object (found {})",
                        path.display(),
                        json_kind(&other)
                    )));
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self {
            path,
            entries: RefCell::new(entries),
            dirty: Cell::new(false),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether staged writes are waiting for [`NativeStore::save`].
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }
}

impl NativeStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .entries
            .borrow()
            .get(key)
            .filter(|v| !v.is_null())
            .cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        self.dirty.set(true);
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        if !self.dirty.get() {
            return Ok(());
        }
        let text = serde_json::to_string_pretty(&*self.entries.borrow())?;
        write_atomically(&self.path, &text)?;
        self.dirty.set(false);
        debug!(target: "mlo.store", path = %self.path.display(), "native store saved");
        Ok(())
    }
}

/// In-memory native store. Counts `save` calls.
#[derive(Debug, Default)]
pub struct MemoryNativeStore {
    entries: RefCell<Map<String, Value>>,
    saves: Cell<u32>,
}

impl MemoryNativeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls.
    #[must_use]
    pub fn save_count(&self) -> u32 {
        self.saves.get()
    }
}

impl NativeStore for MemoryNativeStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .entries
            .borrow()
            .get(key)
            .filter(|v| !v.is_null())
            .cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

impl<S: NativeStore + ?Sized> NativeStore for std::rc::Rc<S> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn save(&self) -> Result<(), StoreError> {
        (**self).save()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(feature = "test-helpers")]
pub use failing::FailingNativeStore;

#[cfg(feature = "test-helpers")]
mod failing {
    use serde_json::Value;

    use super::NativeStore;
    use crate::storage::StoreError;

    /// Native store whose every operation fails.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FailingNativeStore;

    impl NativeStore for FailingNativeStore {
        fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Backend("native store offline".into()))
        }

        fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::Backend("native store offline".into()))
        }

        fn save(&self) -> Result<(), StoreError> {
            Err(StoreError::Backend("native store offline".into()))
        }
    }
}
