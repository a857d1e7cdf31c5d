//! Runtime environment signals: the user's language tag and the document
//! language attribute.

use std::cell::RefCell;

use tracing::debug;

/// The execution environment the UI runs in.
pub trait RuntimeEnv {
    /// The environment's reported user-language tag (e.g. `"en-US"`).
    fn language(&self) -> Option<String>;

    /// Update the document's language attribute.
    fn set_document_lang(&self, tag: &str);
}

/// Environment backed by the operating system locale.
///
/// The language can be pinned with [`SystemEnv::with_language`], which is
/// how tests and the `--lang` override feed a deterministic tag.
#[derive(Debug, Default)]
pub struct SystemEnv {
    pinned_language: Option<String>,
    document_lang: RefCell<Option<String>>,
}

impl SystemEnv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `tag` instead of the OS locale.
    #[must_use]
    pub fn with_language(tag: impl Into<String>) -> Self {
        Self {
            pinned_language: Some(tag.into()),
            document_lang: RefCell::new(None),
        }
    }

    /// The last value written by [`RuntimeEnv::set_document_lang`].
    #[must_use]
    pub fn document_lang(&self) -> Option<String> {
        self.document_lang.borrow().clone()
    }
}

impl RuntimeEnv for SystemEnv {
    fn language(&self) -> Option<String> {
        self.pinned_language
            .clone()
            .or_else(sys_locale::get_locale)
            .map(|tag| tag.replace('_', "-"))
    }

    fn set_document_lang(&self, tag: &str) {
        debug!(target: "mlo.host", lang = tag, "document language updated");
        *self.document_lang.borrow_mut() = Some(tag.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_language_wins() {
        let env = SystemEnv::with_language("en-GB");
        assert_eq!(env.language().as_deref(), Some("en-GB"));
    }

    #[test]
    fn posix_separator_normalized() {
        let env = SystemEnv::with_language("zh_CN");
        assert_eq!(env.language().as_deref(), Some("zh-CN"));
    }

    #[test]
    fn document_lang_recorded() {
        let env = SystemEnv::new();
        assert_eq!(env.document_lang(), None);
        env.set_document_lang("zh-CN");
        assert_eq!(env.document_lang().as_deref(), Some("zh-CN"));
    }
}
