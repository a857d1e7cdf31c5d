#![forbid(unsafe_code)]

//! Host boundary for the Magnetlink Optimizer front-end.
//!
//! Everything the UI layer needs from its surroundings goes through this
//! crate: the native shell's command interface, the runtime's language
//! signal, the two key-value backends (native store and local storage), and
//! the [`PersistenceAdapter`] that picks between them on every call.
//!
//! # Role in Magnetlink Optimizer
//! `mlo-host` keeps the shell and storage seams behind small traits so that
//! `mlo-i18n` and `mlo-app` stay deterministic and testable with in-memory
//! doubles. It has no knowledge of locales or UI state.
//!
//! # Threading
//! The front-end runs on a single UI thread. Shared state uses `Rc`,
//! `RefCell`, and `OnceCell`; none of the types here are `Send`.

pub mod adapter;
pub mod chain;
pub mod env;
pub mod native_store;
pub mod paths;
pub mod probe;
pub mod shell;
pub mod storage;

pub use adapter::{NativeStoreFactory, PersistenceAdapter};
pub use chain::{ChainFailure, ChainOutcome, FallbackChain};
pub use env::{RuntimeEnv, SystemEnv};
pub use native_store::{JsonFileStore, MemoryNativeStore, NativeStore};
pub use probe::{EnvMarkerProbe, FlagProbe, ShellProbe};
pub use shell::{DetachedShell, NativeShell, ShellError};
pub use storage::{FileLocalStorage, LocalStorage, MemoryLocalStorage, StoreError};

#[cfg(feature = "test-helpers")]
pub use native_store::FailingNativeStore;
#[cfg(feature = "test-helpers")]
pub use shell::ScriptedShell;
#[cfg(feature = "test-helpers")]
pub use storage::FailingLocalStorage;
