//! Errors from i18n operations.

use std::path::PathBuf;

use crate::source::BundlePart;

/// Errors from i18n operations.
#[derive(Debug)]
pub enum I18nError {
    /// A locale tag outside the supported set.
    UnsupportedLocale(String),
    /// A bundle part is not available from the source.
    MissingBundle { locale: String, part: BundlePart },
    /// A bundle part could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A bundle part was not a JSON object.
    Parse {
        locale: String,
        part: BundlePart,
        message: String,
    },
}

impl std::fmt::Display for I18nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLocale(tag) => write!(f, "unsupported locale: {tag}"),
            Self::MissingBundle { locale, part } => {
                write!(f, "bundle '{part}' missing for locale '{locale}'")
            }
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Parse {
                locale,
                part,
                message,
            } => write!(f, "bundle '{part}' for '{locale}' is invalid: {message}"),
        }
    }
}

impl std::error::Error for I18nError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
