//! Weekday spellings used across the schema.
//!
//! Lesson requests and meetings tag days with short codes (`mon`), tutor
//! availability with full English names (`Monday`). Both map onto
//! [`chrono::Weekday`]; the serde helper modules keep the wire format stable.

use chrono::Weekday;

/// Monday first, matching the calendar grid.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn full_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn short_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// Case-insensitive: `Monday`, `monday` and `MONDAY` all parse.
pub fn parse_full_name(value: &str) -> Option<Weekday> {
    WEEK.into_iter()
        .find(|day| full_name(*day).eq_ignore_ascii_case(value.trim()))
}

pub fn parse_short_code(value: &str) -> Option<Weekday> {
    WEEK.into_iter()
        .find(|day| short_code(*day).eq_ignore_ascii_case(value.trim()))
}

/// Serde adapter for a single day spelled as its full English name.
pub mod as_full_name {
    use chrono::Weekday;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(super::full_name(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_full_name(&raw).ok_or_else(|| D::Error::custom(format!("unknown weekday: {raw}")))
    }
}

/// Serde adapter for a single day spelled as its short code.
pub mod as_short_code {
    use chrono::Weekday;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(super::short_code(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_short_code(&raw).ok_or_else(|| D::Error::custom(format!("unknown day code: {raw}")))
    }
}

/// Serde adapter for a list of short codes.
pub mod as_short_codes {
    use chrono::Weekday;
    use serde::{de::Error, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(days.len()))?;
        for day in days {
            seq.serialize_element(super::short_code(*day))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Weekday>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|code| {
                super::parse_short_code(code)
                    .ok_or_else(|| D::Error::custom(format!("unknown day code: {code}")))
            })
            .collect()
    }
}
