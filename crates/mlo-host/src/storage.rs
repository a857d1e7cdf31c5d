//! Local storage: the universal string key/value fallback tier.
//!
//! # Invariants
//!
//! 1. Values are opaque strings; JSON encoding is the caller's concern.
//! 2. [`FileLocalStorage`] reads its file at most once and writes the whole
//!    map back on every `set_item`, so a crash loses at most the last write.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing file | First run | Treated as empty storage |
//! | Corrupt file | Hand edits, partial write | `StoreError::Json` on first access |
//! | Write failure | Permissions, full disk | `StoreError::Io`; in-memory map keeps the value |

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Errors from storage backends.
#[derive(Debug)]
pub enum StoreError {
    /// The backend is not attached to this process.
    Unavailable,
    /// Reading or writing the backing file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A value or backing file was not valid JSON.
    Json(serde_json::Error),
    /// Backend-specific failure.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "store unavailable"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Backend(msg) => write!(f, "store backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Plain string key/value storage.
pub trait LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local storage that forgets everything on exit.
#[derive(Debug, Default)]
pub struct MemoryLocalStorage {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryLocalStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Local storage persisted as a JSON object of strings.
#[derive(Debug)]
pub struct FileLocalStorage {
    path: PathBuf,
    items: RefCell<Option<BTreeMap<String, String>>>,
}

impl FileLocalStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            items: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_items<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> R,
    ) -> Result<R, StoreError> {
        let mut slot = self.items.borrow_mut();
        if slot.is_none() {
            *slot = Some(read_string_map(&self.path)?);
        }
        let items = slot.get_or_insert_with(BTreeMap::new);
        Ok(f(items))
    }

    fn flush(&self) -> Result<(), StoreError> {
        let slot = self.items.borrow();
        let Some(items) = slot.as_ref() else {
            return Ok(());
        };
        let text = serde_json::to_string_pretty(items)?;
        write_atomically(&self.path, &text)
    }
}

impl LocalStorage for FileLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_items(|items| items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.with_items(|items| items.insert(key.to_string(), value.to_string()))?;
        self.flush()?;
        debug!(target: "mlo.store", key, path = %self.path.display(), "local storage item written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let removed = self.with_items(|items| items.remove(key).is_some())?;
        if removed {
            self.flush()?;
        }
        Ok(())
    }
}

fn read_string_map(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `text` to a sibling temp file, then rename over `path`.
pub(crate) fn write_atomically(path: &Path, text: &str) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, text).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)
}

#[cfg(feature = "test-helpers")]
pub use failing::FailingLocalStorage;

#[cfg(feature = "test-helpers")]
mod failing {
    use super::{LocalStorage, StoreError};

    /// Local storage whose every operation fails.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FailingLocalStorage;

    impl LocalStorage for FailingLocalStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Backend("local storage disabled".into()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("local storage disabled".into()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("local storage disabled".into()))
        }
    }
}
