//! Persistence adapter: native store first, local storage as fallback.
//!
//! # Invariants
//!
//! 1. **Probe per call**: availability of the native shell is asked on every
//!    `save`/`load`; the answer is never cached.
//! 2. **Construction once**: the native store handle is built by the
//!    injected factory the first time it is needed and reused afterwards.
//!    A failed construction is retried on the next call.
//! 3. **Never raises**: `save` and `load` absorb backend failures, logging
//!    each one as a warning and moving to the next tier.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Shell absent | Probe reports unavailable | Local storage only |
//! | Native write fails | `set` or `save` errors | Value written to local storage |
//! | Native read fails or `null` | Error or missing key | Local storage consulted |
//! | Local value not JSON | Foreign writer | `load` returns `None` |

use std::cell::OnceCell;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::chain::FallbackChain;
use crate::native_store::NativeStore;
use crate::probe::ShellProbe;
use crate::storage::{LocalStorage, StoreError};

/// Builds the native store handle on first use.
pub type NativeStoreFactory = Box<dyn Fn() -> Result<Box<dyn NativeStore>, StoreError>>;

/// One async-free get/set interface over both key/value tiers.
pub struct PersistenceAdapter {
    probe: Box<dyn ShellProbe>,
    factory: NativeStoreFactory,
    native: OnceCell<Box<dyn NativeStore>>,
    local: Rc<dyn LocalStorage>,
}

impl std::fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceAdapter")
            .field("native_created", &self.native_handle_created())
            .finish_non_exhaustive()
    }
}

impl PersistenceAdapter {
    #[must_use]
    pub fn new(
        probe: impl ShellProbe + 'static,
        factory: NativeStoreFactory,
        local: Rc<dyn LocalStorage>,
    ) -> Self {
        Self {
            probe: Box::new(probe),
            factory,
            native: OnceCell::new(),
            local,
        }
    }

    /// Whether the native shell (and so its store) is attached right now.
    #[must_use]
    pub fn is_store_available(&self) -> bool {
        self.probe.is_available()
    }

    /// Whether the native store handle has been constructed.
    #[must_use]
    pub fn native_handle_created(&self) -> bool {
        self.native.get().is_some()
    }

    fn native_store(&self) -> Result<&dyn NativeStore, StoreError> {
        if let Some(store) = self.native.get() {
            return Ok(store.as_ref());
        }
        let store = (self.factory)()?;
        debug!(target: "mlo.store", "native store handle created");
        Ok(self.native.get_or_init(|| store).as_ref())
    }

    /// Persist `value` under `key`.
    pub fn save(&self, key: &str, value: &Value) {
        let available = self.is_store_available();
        let outcome = FallbackChain::<(), StoreError>::new()
            .provider_if(available, "native-store", || {
                let store = self.native_store()?;
                store.set(key, value.clone())?;
                store.save()?;
                Ok(Some(()))
            })
            .provider("local-storage", || {
                let text = serde_json::to_string(value)?;
                self.local.set_item(key, &text)?;
                Ok(Some(()))
            })
            .run();
        outcome.log_failures("save");
        match outcome.provider {
            Some(tier) => debug!(target: "mlo.store", key, tier, "value saved"),
            None => warn!(target: "mlo.store", key, "value not persisted by any tier"),
        }
    }

    /// Read the value stored under `key`, if any tier has one.
    #[must_use]
    pub fn load(&self, key: &str) -> Option<Value> {
        let available = self.is_store_available();
        let outcome = FallbackChain::<Value, StoreError>::new()
            .provider_if(available, "native-store", || self.native_store()?.get(key))
            .provider("local-storage", || match self.local.get_item(key)? {
                Some(text) => Ok(Some(serde_json::from_str(&text)?)),
                None => Ok(None),
            })
            .run();
        outcome.log_failures("load");
        outcome.value.filter(|v| !v.is_null())
    }

    /// Serialize and persist a typed value.
    pub fn save_as<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => self.save(key, &json),
            Err(err) => warn!(target: "mlo.store", key, error = %err, "value not serializable"),
        }
    }

    /// Load and deserialize a typed value. Shape mismatches yield `None`.
    #[must_use]
    pub fn load_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.load(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                warn!(target: "mlo.store", key, error = %err, "stored value has unexpected shape");
                None
            }
        }
    }
}
