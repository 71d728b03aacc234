//! Calendar date/time stored as six clamped integer fields.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::collections::CollectionError;

pub const YEAR_RANGE: (i32, i32) = (1, 9999);

/// Date/time whose persisted form is its individual fields.
///
/// Every field is clamped into its calendar range on construction, on each
/// setter and on deserialization. Day is clamped to 1..=31 only, so a field
/// combination like February 31st can still be stored; [`StoredDateTime::value`]
/// then falls back to `0001-01-01 00:00:00`.
///
/// Equality, ordering and hashing all go through `value()`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "RawDateTime")]
pub struct StoredDateTime {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

/// Unclamped field values as they come out of persisted data.
///
/// Field types must match `StoredDateTime` exactly for non self-describing
/// formats like bincode.
#[derive(Deserialize)]
struct RawDateTime {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl From<RawDateTime> for StoredDateTime {
    fn from(raw: RawDateTime) -> Self {
        Self::new(raw.year, raw.month, raw.day, raw.hour, raw.minute, raw.second)
    }
}

impl Default for StoredDateTime {
    fn default() -> Self {
        Self {
            year: 1900,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

fn fallback() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

impl StoredDateTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year: year.clamp(YEAR_RANGE.0, YEAR_RANGE.1),
            month: month.clamp(1, 12),
            day: day.clamp(1, 31),
            hour: hour.min(23),
            minute: minute.min(59),
            second: second.min(59),
        }
    }

    /// The represented instant, or `0001-01-01 00:00:00` if the fields do not
    /// form a real calendar date.
    pub fn value(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, self.minute, self.second))
            .unwrap_or_else(fallback)
    }

    /// Overwrite every field from `value`. Sub-second precision is dropped.
    pub fn set_value(&mut self, value: NaiveDateTime) {
        *self = Self::new(
            value.year(),
            value.month(),
            value.day(),
            value.hour(),
            value.minute(),
            value.second(),
        );
    }

    pub fn year(&self) -> i32 {
        self.value().year()
    }

    pub fn month(&self) -> u32 {
        self.value().month()
    }

    pub fn day(&self) -> u32 {
        self.value().day()
    }

    pub fn hour(&self) -> u32 {
        self.value().hour()
    }

    pub fn minute(&self) -> u32 {
        self.value().minute()
    }

    pub fn second(&self) -> u32 {
        self.value().second()
    }

    pub fn weekday(&self) -> Weekday {
        self.value().weekday()
    }

    /// Day of the year, starting at 1.
    pub fn ordinal(&self) -> u32 {
        self.value().ordinal()
    }

    pub fn set_year(&mut self, year: i32) {
        self.year = year.clamp(YEAR_RANGE.0, YEAR_RANGE.1);
    }

    pub fn set_month(&mut self, month: u32) {
        self.month = month.clamp(1, 12);
    }

    pub fn set_day(&mut self, day: u32) {
        self.day = day.clamp(1, 31);
    }

    pub fn set_hour(&mut self, hour: u32) {
        self.hour = hour.min(23);
    }

    pub fn set_minute(&mut self, minute: u32) {
        self.minute = minute.min(59);
    }

    pub fn set_second(&mut self, second: u32) {
        self.second = second.min(59);
    }

    /// Shift by `seconds`, rounded to the millisecond.
    ///
    /// Leaves the value untouched and fails if the result would fall outside
    /// years 1..=9999.
    pub fn add_seconds(&mut self, seconds: f64) -> Result<&mut Self, CollectionError> {
        let millis = (seconds * 1000.0).round();
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
            return Err(CollectionError::DateOutOfRange);
        }

        let shifted = TimeDelta::try_milliseconds(millis as i64)
            .and_then(|delta| self.value().checked_add_signed(delta))
            .filter(|value| (YEAR_RANGE.0..=YEAR_RANGE.1).contains(&value.year()))
            .ok_or(CollectionError::DateOutOfRange)?;

        self.set_value(shifted);
        Ok(self)
    }
}

impl From<NaiveDateTime> for StoredDateTime {
    fn from(value: NaiveDateTime) -> Self {
        let mut stored = Self::default();
        stored.set_value(value);
        stored
    }
}

impl From<StoredDateTime> for NaiveDateTime {
    fn from(stored: StoredDateTime) -> Self {
        stored.value()
    }
}

impl fmt::Display for StoredDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value().format("%m-%d-%Y %H:%M:%S"))
    }
}

impl PartialEq for StoredDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for StoredDateTime {}

impl PartialOrd for StoredDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StoredDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value().cmp(&other.value())
    }
}

impl Hash for StoredDateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value().hash(state);
    }
}
