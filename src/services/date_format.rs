//! Human-readable timestamps.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use icu::calendar::{DateTime as IcuDateTime, Gregorian};
use icu::datetime::{options::length, TypedDateTimeFormatter};
use icu::locid::Locale;
use std::fmt::{Display, Write};
use std::sync::Arc;

/// What unparsable input renders as.
pub const INVALID_DATE: &str = "Invalid Date";

/// en-US medium date, short time (`Oct 19, 2026, 3:04 PM`), used when no
/// locale can be resolved.
const MEDIUM_SHORT: &str = "%b %-d, %Y, %-I:%M %p";

/// Offset-less date-time layouts, read as local time.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Format a timestamp string in the local timezone and the host locale.
///
/// Never fails: input that cannot be parsed renders as `Invalid Date`.
pub fn format_date(input: &str) -> String {
    format_date_in(input, &Local)
}

/// Format a timestamp string in an explicit timezone and the host locale.
pub fn format_date_in<Tz>(input: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateFormatter::new(None, host_locale(None)).format_in(input, tz)
}

/// Parse a timestamp the way the countdown and the formatter read them.
///
/// Accepts RFC 3339 and RFC 2822 with offsets, ISO-8601 date-times without an
/// offset (taken as local time in `tz`), and bare ISO dates (taken as UTC
/// midnight).
pub fn parse_timestamp_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, layout) {
            // skipped local times (DST gaps) do not exist
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// [`parse_timestamp_in`] using the local timezone.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    parse_timestamp_in(input, &Local)
}

/// Resolve the locale to format with: `preferred` if given, else the host's.
///
/// POSIX spellings such as `de_DE.UTF-8` are accepted. Returns `None` for
/// `C`/`POSIX` or anything that is not a valid BCP-47 tag.
pub fn host_locale(preferred: Option<&str>) -> Option<Locale> {
    let tag = match preferred {
        Some(tag) => tag.to_string(),
        None => sys_locale::get_locale()?,
    };
    let tag = tag
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .replace('_', "-");
    if tag.eq_ignore_ascii_case("C") || tag.eq_ignore_ascii_case("POSIX") {
        return None;
    }

    match tag.parse::<Locale>() {
        Ok(locale) => Some(locale),
        Err(e) => {
            tracing::debug!(%tag, error = ?e, "unusable locale, falling back to en-US");
            None
        }
    }
}

/// Formats timestamps as medium date, short time.
///
/// Uses the CLDR conventions of its locale. Without a locale it renders the
/// en-US form; a strftime pattern from configuration replaces both.
#[derive(Clone, Default)]
pub struct DateFormatter {
    pattern: Option<String>,
    icu: Option<Arc<TypedDateTimeFormatter<Gregorian>>>,
}

impl DateFormatter {
    pub fn new(pattern: Option<String>, locale: Option<Locale>) -> Self {
        let icu = locale.and_then(|locale| {
            let options =
                length::Bag::from_date_time_style(length::Date::Medium, length::Time::Short);
            match TypedDateTimeFormatter::<Gregorian>::try_new(&locale.into(), options.into()) {
                Ok(formatter) => Some(Arc::new(formatter)),
                Err(e) => {
                    tracing::warn!(error = ?e, "no date format data for locale, using en-US");
                    None
                }
            }
        });
        Self { pattern, icu }
    }

    /// Format in the local timezone.
    pub fn format(&self, input: &str) -> String {
        self.format_in(input, &Local)
    }

    pub fn format_in<Tz>(&self, input: &str, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let Some(instant) = parse_timestamp_in(input, tz) else {
            return INVALID_DATE.to_string();
        };
        let local = instant.with_timezone(tz);

        if let Some(pattern) = &self.pattern {
            let mut out = String::new();
            if write!(out, "{}", local.format(pattern)).is_ok() {
                return out;
            }
            tracing::warn!(%pattern, "invalid date pattern, using default");
        }

        if let Some(icu) = &self.icu {
            let gregorian = IcuDateTime::try_new_gregorian_datetime(
                local.year(),
                local.month() as u8,
                local.day() as u8,
                local.hour() as u8,
                local.minute() as u8,
                local.second() as u8,
            );
            if let Ok(gregorian) = gregorian {
                return icu.format_to_string(&gregorian);
            }
        }

        local.format(MEDIUM_SHORT).to_string()
    }
}
