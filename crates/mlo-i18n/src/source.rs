//! Where bundle parts come from.
//!
//! A locale's messages are split into parts (one JSON file each). Parts are
//! addressed by [`BundlePart`] and read through a [`BundleSource`]:
//!
//! - [`EmbeddedSource`]: the shipped bundles, compiled into the binary.
//! - [`DirSource`]: `<root>/<locale>/<part>.json` on disk.
//! - [`Layered`]: an override source consulted first, a base source when the
//!   override has no file for that part.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::bundle::MessageBundle;
use crate::error::I18nError;
use crate::locale::SupportedLocale;

/// Page bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Settings,
    Favorites,
    Engines,
    Priority,
}

impl Page {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Settings => "settings",
            Self::Favorites => "favorites",
            Self::Engines => "engines",
            Self::Priority => "priority",
        }
    }
}

/// Component bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    ResultCard,
}

impl Component {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ResultCard => "resultcard",
        }
    }
}

/// One JSON file of a locale's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundlePart {
    Common,
    Page(Page),
    Errors,
    Component(Component),
}

impl BundlePart {
    /// Parts in merge order. Later parts override earlier ones.
    pub const LOAD_ORDER: [BundlePart; 8] = [
        BundlePart::Common,
        BundlePart::Page(Page::Home),
        BundlePart::Page(Page::Settings),
        BundlePart::Page(Page::Favorites),
        BundlePart::Page(Page::Engines),
        BundlePart::Page(Page::Priority),
        BundlePart::Errors,
        BundlePart::Component(Component::ResultCard),
    ];

    /// Position of the part in [`Self::LOAD_ORDER`].
    #[must_use]
    pub const fn load_index(self) -> usize {
        match self {
            Self::Common => 0,
            Self::Page(Page::Home) => 1,
            Self::Page(Page::Settings) => 2,
            Self::Page(Page::Favorites) => 3,
            Self::Page(Page::Engines) => 4,
            Self::Page(Page::Priority) => 5,
            Self::Errors => 6,
            Self::Component(Component::ResultCard) => 7,
        }
    }

    /// Path of the part relative to a locale directory, without extension.
    #[must_use]
    pub fn relative_path(self) -> String {
        match self {
            Self::Common => "common".to_string(),
            Self::Page(page) => format!("pages/{}", page.name()),
            Self::Errors => "messages/errors".to_string(),
            Self::Component(component) => format!("components/{}", component.name()),
        }
    }
}

impl fmt::Display for BundlePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path())
    }
}

/// Reads bundle parts for a locale.
pub trait BundleSource {
    fn read(&self, locale: SupportedLocale, part: BundlePart) -> Result<MessageBundle, I18nError>;
}

impl<S: BundleSource + ?Sized> BundleSource for Box<S> {
    fn read(&self, locale: SupportedLocale, part: BundlePart) -> Result<MessageBundle, I18nError> {
        (**self).read(locale, part)
    }
}

impl<S: BundleSource + ?Sized> BundleSource for std::rc::Rc<S> {
    fn read(&self, locale: SupportedLocale, part: BundlePart) -> Result<MessageBundle, I18nError> {
        (**self).read(locale, part)
    }
}

fn parse_part(
    locale: SupportedLocale,
    part: BundlePart,
    text: &str,
) -> Result<MessageBundle, I18nError> {
    MessageBundle::from_json_str(text).map_err(|err| I18nError::Parse {
        locale: locale.tag().to_string(),
        part,
        message: err.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Embedded bundles
// ---------------------------------------------------------------------------

macro_rules! locale_file {
    ($tag:literal, $path:literal) => {
        include_str!(concat!("../locales/", $tag, "/", $path, ".json"))
    };
}

macro_rules! locale_table {
    ($tag:literal) => {
        [
            locale_file!($tag, "common"),
            locale_file!($tag, "pages/home"),
            locale_file!($tag, "pages/settings"),
            locale_file!($tag, "pages/favorites"),
            locale_file!($tag, "pages/engines"),
            locale_file!($tag, "pages/priority"),
            locale_file!($tag, "messages/errors"),
            locale_file!($tag, "components/resultcard"),
        ]
    };
}

const ZH_CN_FILES: [&str; 8] = locale_table!("zh-CN");
const EN_FILES: [&str; 8] = locale_table!("en");

/// Bundles compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl EmbeddedSource {
    /// Raw JSON text of an embedded part.
    #[must_use]
    pub fn text(locale: SupportedLocale, part: BundlePart) -> &'static str {
        let files = match locale {
            SupportedLocale::ZhCn => &ZH_CN_FILES,
            SupportedLocale::En => &EN_FILES,
        };
        files[part.load_index()]
    }
}

impl BundleSource for EmbeddedSource {
    fn read(&self, locale: SupportedLocale, part: BundlePart) -> Result<MessageBundle, I18nError> {
        parse_part(locale, part, Self::text(locale, part))
    }
}

// ---------------------------------------------------------------------------
// Directory bundles
// ---------------------------------------------------------------------------

/// Bundles read from `<root>/<locale>/<part>.json`.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding `part` for `locale`.
    #[must_use]
    pub fn path_for(&self, locale: SupportedLocale, part: BundlePart) -> PathBuf {
        self.root
            .join(locale.tag())
            .join(format!("{}.json", part.relative_path()))
    }
}

impl BundleSource for DirSource {
    fn read(&self, locale: SupportedLocale, part: BundlePart) -> Result<MessageBundle, I18nError> {
        let path = self.path_for(locale, part);
        match std::fs::read_to_string(&path) {
            Ok(text) => parse_part(locale, part, &text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(I18nError::MissingBundle {
                locale: locale.tag().to_string(),
                part,
            }),
            Err(source) => Err(I18nError::Io { path, source }),
        }
    }
}

// ---------------------------------------------------------------------------
// Layering
// ---------------------------------------------------------------------------

/// Reads from `overlay`, falling through to `base` only for missing parts.
///
/// A part that exists in `overlay` but fails to parse is an error; it does
/// not silently fall through.
#[derive(Debug, Clone)]
pub struct Layered<O, B> {
    overlay: O,
    base: B,
}

impl<O: BundleSource, B: BundleSource> Layered<O, B> {
    #[must_use]
    pub fn new(overlay: O, base: B) -> Self {
        Self { overlay, base }
    }
}

impl<O: BundleSource, B: BundleSource> BundleSource for Layered<O, B> {
    fn read(&self, locale: SupportedLocale, part: BundlePart) -> Result<MessageBundle, I18nError> {
        match self.overlay.read(locale, part) {
            Err(I18nError::MissingBundle { .. }) => self.base.read(locale, part),
            other => other,
        }
    }
}
