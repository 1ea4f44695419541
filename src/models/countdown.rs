//! Countdown state derived from an expiry instant.

use chrono::{DateTime, Utc};
use std::fmt;

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time left before expiry, split for display.
///
/// Hours wrap at 24: whole days are dropped, so 25h remaining shows as `1h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    /// Floor decomposition of a non-negative millisecond count.
    pub fn from_millis(ms: i64) -> Self {
        Self {
            hours: (ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (ms % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}

/// State of a countdown at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Running(Remaining),
    Expired,
}

impl CountdownState {
    /// Compare `now` against `expires_at`. Exactly at the instant still counts as running.
    pub fn at(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if expires_at < now {
            return Self::Expired;
        }
        let distance = expires_at.signed_duration_since(now).num_milliseconds();
        Self::Running(Remaining::from_millis(distance))
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }

    /// Markup shown in the countdown element.
    pub fn to_html(&self) -> String {
        match self {
            Self::Running(remaining) => format!("Expires in: <strong>{}</strong>", remaining),
            Self::Expired => "Expired".to_string(),
        }
    }
}
