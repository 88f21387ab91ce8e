//! Clock-time ranges as written on schedule rows.
//!
//! Ranges look like `9:00AM - 12:30PM`. Whitespace is ignored, the
//! meridiem is case-insensitive, and both ends sit on the same (arbitrary)
//! calendar day, so overlap is compared on clock time alone.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};

/// Format for one end of a range, e.g. `9:00AM`.
const CLOCK_FORMAT: &str = "%I:%M%p";

/// A parsed `<h>:<mm><am|pm>-<h>:<mm><am|pm>` range.
///
/// # Example
///
/// ```
/// use shift_resolver::models::TimeRange;
/// use rust_decimal::Decimal;
///
/// let range = TimeRange::parse("9:00AM - 12:30PM").unwrap();
/// assert_eq!(range.hours(), Decimal::new(35, 1)); // 3.5 hours
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    /// Parses a raw time range.
    ///
    /// # Arguments
    ///
    /// * `raw` - The range as written, e.g. `"9:00AM - 12:30PM"`
    ///
    /// # Returns
    ///
    /// The parsed range, or [`EngineError::TimeFormat`] when the text does
    /// not match the expected pattern.
    pub fn parse(raw: &str) -> EngineResult<Self> {
        // "9:00 AM - 12:30 PM" and "9:00AM-12:30PM" are the same range
        let normalized = Self::normalize(raw);

        // Exactly one separator; a third part means a stray '-'
        let mut ends = normalized.split('-');
        let (start, end) = match (ends.next(), ends.next(), ends.next()) {
            (Some(start), Some(end), None) => (start, end),
            _ => {
                return Err(EngineError::time_format(
                    raw,
                    "expected exactly one '-' between start and end",
                ));
            }
        };

        Ok(Self {
            start: parse_clock(raw, start)?,
            end: parse_clock(raw, end)?,
        })
    }

    /// Removes all whitespace from a raw range.
    pub fn normalize(raw: &str) -> String {
        raw.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Returns the start clock time.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Returns the end clock time.
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Returns the duration in hours.
    ///
    /// An end earlier than the start means the shift crosses midnight, so
    /// 24 hours are added.
    pub fn hours(&self) -> Decimal {
        let mut minutes = (self.end - self.start).num_minutes();
        // Overnight shift, e.g. 11:00PM-3:00AM
        if minutes < 0 {
            minutes += 24 * 60;
        }
        Decimal::new(minutes, 0) / Decimal::new(60, 0)
    }

    /// Returns true if the two ranges strictly overlap.
    ///
    /// Touching boundaries (one ends exactly when the other starts) do not
    /// overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        // Disjoint when one ends at or before the other starts
        !(self.end <= other.start || self.start >= other.end)
    }
}

impl FromStr for TimeRange {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%-I:%M%p"),
            self.end.format("%-I:%M%p")
        )
    }
}

fn parse_clock(raw: &str, clock: &str) -> EngineResult<NaiveTime> {
    // chrono tolerates a single-digit minute; the schedule format does not.
    let well_formed = match clock.split_once(':') {
        Some((hour, rest)) => {
            (1..=2).contains(&hour.len())
                && rest.len() == 4
                && rest.as_bytes()[..2].iter().all(u8::is_ascii_digit)
        }
        None => false,
    };
    if !well_formed {
        return Err(EngineError::time_format(
            raw,
            format!("'{}' is not of the form h:mmAM or h:mmPM", clock),
        ));
    }

    // %I rejects hour 0 and 13+, %p accepts am/pm in any case
    NaiveTime::parse_from_str(clock, CLOCK_FORMAT)
        .map_err(|e| EngineError::time_format(raw, format!("'{}': {}", clock, e)))
}
