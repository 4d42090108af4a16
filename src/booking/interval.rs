use chrono::{NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidFormat(String),

    #[error("time '{0}' must be on a whole minute")]
    NotWholeMinute(String),

    #[error("end time {end} must be later than start time {start}")]
    EmptyInterval { start: TimeOfDay, end: TimeOfDay },
}

/// Time of day at minute resolution, stored as minutes since midnight.
///
/// `24:00` is representable so that a block or booking can run to the end of
/// the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(TimeOfDay(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour.checked_mul(60)?.checked_add(minute)?)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "24:00" || s == "24:00:00" {
            return Ok(TimeOfDay::END_OF_DAY);
        }

        let parsed = NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map_err(|_| TimeError::InvalidFormat(s.to_string()))?;

        if parsed.second() != 0 || parsed.nanosecond() != 0 {
            return Err(TimeError::NotWholeMinute(s.to_string()));
        }

        Ok(TimeOfDay((parsed.hour() * 60 + parsed.minute()) as u16))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Half-open range `[start, end)` within one day. Always non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl Interval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, TimeError> {
        if end <= start {
            return Err(TimeError::EmptyInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.0 - self.start.0
    }

    /// Touching endpoints do not overlap: `[9:00,10:00)` and `[10:00,11:00)`
    /// are disjoint.
    pub fn overlaps(&self, other: &Interval) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Returns true if `candidate` overlaps any of `existing`.
///
/// Callers are responsible for only passing intervals from the same room and
/// date as the candidate.
pub fn has_conflict<'a, I>(existing: I, candidate: &Interval) -> bool
where
    I: IntoIterator<Item = &'a Interval>,
{
    existing.into_iter().any(|interval| interval.overlaps(candidate))
}
