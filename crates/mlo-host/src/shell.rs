//! Native-shell command interface.
//!
//! The shell exposes named commands that take a JSON argument record and
//! return a JSON value or fail. Only two commands are used by the
//! front-end: [`GET_APP_LOCALE`] and [`SET_APP_LOCALE_WITH_PERSISTENCE`].
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Shell absent | Running outside the native host | `ShellError::Unavailable` |
//! | Command error | Shell-side handler failed | `ShellError::Command` |
//! | Bad payload | Shell returned an unexpected JSON shape | `ShellError::InvalidResponse` |

use serde_json::{Value, json};

/// Ask the shell for its persisted locale tag.
pub const GET_APP_LOCALE: &str = "get_app_locale";

/// Tell the shell to switch and persist a locale (`{ "locale": tag }`).
pub const SET_APP_LOCALE_WITH_PERSISTENCE: &str = "set_app_locale_with_persistence";

/// Errors raised by native-shell commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// No native shell is attached to this process.
    Unavailable,
    /// The shell does not know the command.
    UnknownCommand(String),
    /// The command ran and reported a failure.
    Command { command: String, message: String },
    /// The command returned a value of the wrong shape.
    InvalidResponse { command: String, message: String },
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "native shell unavailable"),
            Self::UnknownCommand(cmd) => write!(f, "unknown shell command: {cmd}"),
            Self::Command { command, message } => {
                write!(f, "shell command '{command}' failed: {message}")
            }
            Self::InvalidResponse { command, message } => {
                write!(f, "invalid response from '{command}': {message}")
            }
        }
    }
}

impl std::error::Error for ShellError {}

/// A host that executes named commands.
pub trait NativeShell {
    /// Invoke `command` with a JSON argument record.
    fn invoke(&self, command: &str, args: Value) -> Result<Value, ShellError>;
}

/// Shell used when the UI runs without a native host. Every command fails
/// with [`ShellError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedShell;

impl NativeShell for DetachedShell {
    fn invoke(&self, _command: &str, _args: Value) -> Result<Value, ShellError> {
        Err(ShellError::Unavailable)
    }
}

/// Query the shell's persisted locale.
///
/// `null` means the shell has nothing stored; any other non-string value is
/// reported as an invalid response.
pub fn get_app_locale(shell: &dyn NativeShell) -> Result<Option<String>, ShellError> {
    let value = shell.invoke(GET_APP_LOCALE, Value::Object(Default::default()))?;
    match value {
        Value::Null => Ok(None),
        Value::String(tag) if tag.is_empty() => Ok(None),
        Value::String(tag) => Ok(Some(tag)),
        other => Err(ShellError::InvalidResponse {
            command: GET_APP_LOCALE.to_string(),
            message: format!("expected a locale string, got {other}"),
        }),
    }
}

/// Notify the shell of a locale change so it can persist it.
pub fn set_app_locale_with_persistence(
    shell: &dyn NativeShell,
    locale: &str,
) -> Result<(), ShellError> {
    shell
        .invoke(SET_APP_LOCALE_WITH_PERSISTENCE, json!({ "locale": locale }))
        .map(|_| ())
}

#[cfg(feature = "test-helpers")]
pub use scripted::ScriptedShell;

#[cfg(feature = "test-helpers")]
mod scripted {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use serde_json::Value;

    use super::{NativeShell, ShellError};

    /// In-memory shell with canned responses and a call log.
    ///
    /// Commands without a scripted response fail with
    /// [`ShellError::UnknownCommand`].
    #[derive(Debug, Default)]
    pub struct ScriptedShell {
        responses: RefCell<HashMap<String, Result<Value, ShellError>>>,
        calls: RefCell<Vec<(String, Value)>>,
    }

    impl ScriptedShell {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the response for `command`.
        pub fn respond(&self, command: &str, response: Result<Value, ShellError>) {
            self.responses
                .borrow_mut()
                .insert(command.to_string(), response);
        }

        /// Every `(command, args)` pair invoked so far, in order.
        #[must_use]
        pub fn calls(&self) -> Vec<(String, Value)> {
            self.calls.borrow().clone()
        }

        /// Calls made for one command.
        #[must_use]
        pub fn calls_to(&self, command: &str) -> Vec<Value> {
            self.calls
                .borrow()
                .iter()
                .filter(|(name, _)| name == command)
                .map(|(_, args)| args.clone())
                .collect()
        }
    }

    impl NativeShell for ScriptedShell {
        fn invoke(&self, command: &str, args: Value) -> Result<Value, ShellError> {
            self.calls.borrow_mut().push((command.to_string(), args));
            self.responses
                .borrow()
                .get(command)
                .cloned()
                .unwrap_or_else(|| Err(ShellError::UnknownCommand(command.to_string())))
        }
    }
}
