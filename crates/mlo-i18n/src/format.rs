//! Value formatting for display: file sizes, percentages, relative times.

use web_time::{Duration, SystemTime};

use crate::locale::SupportedLocale;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count in 1024-based units with two decimals.
///
/// Values past the largest unit stay in `TB`.
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.2} {}", SIZE_UNITS[unit])
}

/// Format a ratio (`0.25`) as a percentage (`"25.0%"`).
#[must_use]
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

/// Decimals used by [`format_percentage`] callers that have no preference.
pub const DEFAULT_PERCENT_DECIMALS: usize = 1;

/// Describe how long ago `then` was, relative to `now`.
///
/// Times in the future read as "just now".
#[must_use]
pub fn format_relative_time(then: SystemTime, now: SystemTime, locale: SupportedLocale) -> String {
    let elapsed = now.duration_since(then).unwrap_or(Duration::ZERO);
    format_elapsed(elapsed, locale)
}

/// Describe an elapsed duration as "N units ago".
#[must_use]
pub fn format_elapsed(elapsed: Duration, locale: SupportedLocale) -> String {
    let secs = elapsed.as_secs();
    let (count, unit) = match secs {
        0..60 => return just_now(locale).to_string(),
        60..3600 => (secs / 60, Unit::Minute),
        3600..86_400 => (secs / 3600, Unit::Hour),
        _ => (secs / 86_400, Unit::Day),
    };
    match locale {
        SupportedLocale::ZhCn => {
            let word = match unit {
                Unit::Minute => "分钟",
                Unit::Hour => "小时",
                Unit::Day => "天",
            };
            format!("{count} {word}前")
        }
        SupportedLocale::En => {
            let word = match unit {
                Unit::Minute => "minute",
                Unit::Hour => "hour",
                Unit::Day => "day",
            };
            let s = if count == 1 { "" } else { "s" };
            format!("{count} {word}{s} ago")
        }
    }
}

#[derive(Clone, Copy)]
enum Unit {
    Minute,
    Hour,
    Day,
}

fn just_now(locale: SupportedLocale) -> &'static str {
    match locale {
        SupportedLocale::ZhCn => "刚刚",
        SupportedLocale::En => "just now",
    }
}
