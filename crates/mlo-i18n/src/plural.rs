//! Plural categories and choice messages.
//!
//! A plural message packs its forms into one string separated by `|`:
//!
//! - two forms: `"{count} item | {count} items"` (one, other)
//! - three forms: `"no items | {count} item | {count} items"` (zero, one, other)
//!
//! A message without `|` is used for every count.

/// CLDR plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Other,
}

/// Per-language rule mapping a count to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// `one` for |n| = 1, `other` otherwise.
    English,
    /// No grammatical plural: always `other`.
    Cjk,
}

impl PluralRule {
    /// Pick the rule for a locale tag by its primary subtag.
    #[must_use]
    pub fn for_locale(tag: &str) -> Self {
        match crate::locale::primary_subtag(tag) {
            "zh" | "ja" | "ko" => Self::Cjk,
            _ => Self::English,
        }
    }

    #[must_use]
    pub fn categorize(self, count: i64) -> PluralCategory {
        match self {
            Self::English if count.unsigned_abs() == 1 => PluralCategory::One,
            Self::English | Self::Cjk => PluralCategory::Other,
        }
    }
}

/// Forms split out of a `|`-separated message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralForms<'a> {
    forms: Vec<&'a str>,
}

impl<'a> PluralForms<'a> {
    /// Split a message on `|`, trimming whitespace around each form.
    #[must_use]
    pub fn parse(message: &'a str) -> Self {
        Self {
            forms: message.split('|').map(str::trim).collect(),
        }
    }

    /// Number of forms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// The last form: the "other" category whatever the form count.
    #[must_use]
    pub fn other(&self) -> &'a str {
        self.forms.last().copied().unwrap_or("")
    }

    /// Select the form for `count` under `rule`.
    ///
    /// With three forms, a zero count always takes the first form.
    #[must_use]
    pub fn select(&self, rule: PluralRule, count: i64) -> &'a str {
        let category = rule.categorize(count);
        let index = match self.forms.len() {
            0 | 1 => 0,
            2 => match category {
                PluralCategory::One => 0,
                _ => 1,
            },
            n => {
                if count == 0 {
                    0
                } else {
                    match category {
                        PluralCategory::One => 1,
                        _ => n - 1,
                    }
                }
            }
        };
        self.forms.get(index).copied().unwrap_or("")
    }
}
