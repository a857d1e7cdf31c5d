//! Native-shell availability probes.
//!
//! The shell may finish initialising after the UI starts, so callers ask a
//! probe on every operation instead of caching the answer.

use std::cell::Cell;
use std::ffi::OsString;
use std::rc::Rc;

/// Reports whether the native shell is attached right now.
pub trait ShellProbe {
    fn is_available(&self) -> bool;
}

impl<F: Fn() -> bool> ShellProbe for F {
    fn is_available(&self) -> bool {
        self()
    }
}

/// Probe that checks for a marker environment variable injected by the
/// native shell. The variable is read on every call.
#[derive(Debug, Clone)]
pub struct EnvMarkerProbe {
    var: OsString,
}

impl EnvMarkerProbe {
    /// Default marker the shell sets before launching the UI.
    pub const DEFAULT_VAR: &'static str = "MLO_NATIVE_SHELL";

    #[must_use]
    pub fn new(var: impl Into<OsString>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvMarkerProbe {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VAR)
    }
}

impl ShellProbe for EnvMarkerProbe {
    fn is_available(&self) -> bool {
        std::env::var_os(&self.var).is_some_and(|v| !v.is_empty())
    }
}

/// Shared on/off switch. Clones observe the same flag, so a host can flip
/// availability after handing the probe to an adapter.
#[derive(Debug, Clone, Default)]
pub struct FlagProbe {
    flag: Rc<Cell<bool>>,
}

impl FlagProbe {
    #[must_use]
    pub fn new(available: bool) -> Self {
        Self {
            flag: Rc::new(Cell::new(available)),
        }
    }

    pub fn set(&self, available: bool) {
        self.flag.set(available);
    }
}

impl ShellProbe for FlagProbe {
    fn is_available(&self) -> bool {
        self.flag.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_probe_clones_share_state() {
        let probe = FlagProbe::new(false);
        let handle = probe.clone();
        assert!(!probe.is_available());
        handle.set(true);
        assert!(probe.is_available());
    }

    #[test]
    fn closure_probe() {
        let probe = || true;
        assert!(probe.is_available());
    }

    #[test]
    fn env_marker_missing_is_unavailable() {
        let probe = EnvMarkerProbe::new("MLO_TEST_MARKER_THAT_IS_NEVER_SET");
        assert!(!probe.is_available());
    }
}
