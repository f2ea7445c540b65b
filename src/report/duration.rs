//! Day/hour/minute/second durations as they appear in performance reports.
//!
//! Report durations are literals like `[2.11:34:03.159]` (days, hours,
//! minutes, seconds, milliseconds). Milliseconds are dropped. Components are
//! kept unnormalized while summing so that addition never loses anything;
//! [`Duration::normalize`] carries overflow upwards for display.

use std::fmt;
use std::ops::{Add, AddAssign};

use serde::Serialize;

/// Largest total a single report literal may carry (about 136 years).
///
/// Keeps every sum of report durations far away from `u64` overflow.
pub const MAX_LITERAL_SECONDS: u64 = u32::MAX as u64;

/// A compute duration in days, hours, minutes and seconds.
///
/// `hours`, `minutes` and `seconds` may exceed their modulus until
/// [`normalize`](Self::normalize) is called. Equality compares components,
/// so compare [`to_seconds`](Self::to_seconds) when the representation may
/// differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Duration {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Duration {
    /// The zero accumulator.
    pub const ZERO: Duration = Duration {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn new(days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Build a duration from the digit groups of a computational literal.
    ///
    /// Returns `None` when a group is empty or not a number, or when the
    /// total exceeds [`MAX_LITERAL_SECONDS`].
    pub fn parse_parts(days: &str, hours: &str, minutes: &str, seconds: &str) -> Option<Self> {
        let duration = Self::new(
            days.parse().ok()?,
            hours.parse().ok()?,
            minutes.parse().ok()?,
            seconds.parse().ok()?,
        );
        duration
            .checked_seconds()
            .filter(|total| *total <= MAX_LITERAL_SECONDS)
            .map(|_| duration)
    }

    fn checked_seconds(&self) -> Option<u64> {
        self.days
            .checked_mul(86_400)?
            .checked_add(self.hours.checked_mul(3_600)?)?
            .checked_add(self.minutes.checked_mul(60)?)?
            .checked_add(self.seconds)
    }

    /// Total number of seconds, saturating at `u64::MAX`.
    pub fn to_seconds(&self) -> u64 {
        self.checked_seconds().unwrap_or(u64::MAX)
    }

    /// Carry overflowing seconds, minutes and hours into the next unit.
    pub fn normalize(&mut self) {
        self.minutes = self.minutes.saturating_add(self.seconds / 60);
        self.seconds %= 60;
        self.hours = self.hours.saturating_add(self.minutes / 60);
        self.minutes %= 60;
        self.days = self.days.saturating_add(self.hours / 24);
        self.hours %= 24;
    }

    /// Normalized copy of this duration.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, other: Duration) -> Duration {
        Duration {
            days: self.days.saturating_add(other.days),
            hours: self.hours.saturating_add(other.hours),
            minutes: self.minutes.saturating_add(other.minutes),
            seconds: self.seconds.saturating_add(other.seconds),
        }
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, other: Duration) {
        *self = *self + other;
    }
}

impl std::iter::Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Self {
        iter.fold(Duration::ZERO, |acc, d| acc + d)
    }
}

impl fmt::Display for Duration {
    /// Renders `[dd.hh:mm:ss]` from the normalized value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.normalized();
        write!(
            f,
            "[{:>2}.{:02}:{:02}:{:02}]",
            d.days, d.hours, d.minutes, d.seconds
        )
    }
}

/// Format an integer with comma thousands separators (`1234567` -> `1,234,567`).
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
