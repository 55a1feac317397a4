//! Clock-time helpers and the coarse time-of-day classification.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Coarse period of the day a session starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }

    /// Classifies `time` into its band.
    ///
    /// Bands are half-open with an inclusive lower bound:
    ///
    /// | band      | range           |
    /// |-----------|-----------------|
    /// | morning   | `[08:00, 12:00)` |
    /// | afternoon | `[12:00, 16:00)` |
    /// | evening   | `[16:00, 20:00)` |
    ///
    /// Anything outside `[08:00, 20:00)` has no band and yields `None`.
    pub fn classify(time: NaiveTime) -> Option<TimeOfDay> {
        match time.hour() {
            8..=11 => Some(TimeOfDay::Morning),
            12..=15 => Some(TimeOfDay::Afternoon),
            16..=19 => Some(TimeOfDay::Evening),
            _ => None,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            other => Err(format!("unknown time of day: {other}")),
        }
    }
}

/// Parses a form clock value, `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Renders a time as `HH:MM`.
pub fn format_hm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// `"HH:MM - HH:MM"`, the display form shared by requests and meetings.
pub fn format_range(start: NaiveTime, end: NaiveTime) -> String {
    format!("{} - {}", format_hm(start), format_hm(end))
}
