//! # Lesson Requests
//!
//! A student's open ask for tutoring, waiting for an admin to turn it into a
//! meeting. The end time and time-of-day tag are never set directly: they
//! are derived from the start time and duration by [`resolve_times`] every
//! time the request is written.

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::{format_range, parse_clock_time, TimeOfDay};
use super::weekday;
use crate::errors::FieldErrors;

const REQUIRED: &str = "This field is required.";

/// Start times a student may ask for, in seconds from midnight: 08:00 to
/// 20:00, both inclusive.
pub const START_WINDOW: RangeInclusive<u32> = 8 * 3600..=20 * 3600;

text_choices! {
    /// Subject area a lesson is requested for.
    KnowledgeArea {
        Cpp => "c++",
        Scala => "scala",
        Java => "java",
        Python => "python",
        Ruby => "ruby",
    }
}

text_choices! {
    Term {
        SeptDec => "sept-dec",
        JanApril => "jan-april",
        MayJuly => "may-july",
    }
}

text_choices! {
    Venue {
        Online => "online",
        Onsite => "onsite",
    }
}

/// Lesson length. Only the listed lengths are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum LessonDuration {
    HalfHour,
    Hour,
    HourAndHalf,
    TwoHours,
}

impl LessonDuration {
    pub const ALL: [LessonDuration; 4] = [
        LessonDuration::HalfHour,
        LessonDuration::Hour,
        LessonDuration::HourAndHalf,
        LessonDuration::TwoHours,
    ];

    pub fn minutes(&self) -> i32 {
        match self {
            LessonDuration::HalfHour => 30,
            LessonDuration::Hour => 60,
            LessonDuration::HourAndHalf => 90,
            LessonDuration::TwoHours => 120,
        }
    }

    pub fn as_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes()))
    }
}

impl TryFrom<i32> for LessonDuration {
    type Error = String;

    fn try_from(minutes: i32) -> Result<Self, Self::Error> {
        LessonDuration::ALL
            .into_iter()
            .find(|d| d.minutes() == minutes)
            .ok_or_else(|| format!("unsupported lesson duration: {minutes} minutes"))
    }
}

impl From<LessonDuration> for i32 {
    fn from(duration: LessonDuration) -> Self {
        duration.minutes()
    }
}

/// Values derived from a request's start time and duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTimes {
    pub end_time: Option<NaiveTime>,
    pub time_of_day: Option<TimeOfDay>,
}

/// Derives the end time and time-of-day tag of a lesson.
///
/// Without a start time both stay unset. Clock arithmetic wraps at midnight.
pub fn resolve_times(start_time: Option<NaiveTime>, duration: LessonDuration) -> ResolvedTimes {
    match start_time {
        Some(start) => ResolvedTimes {
            end_time: Some(start.overflowing_add_signed(duration.as_duration()).0),
            time_of_day: TimeOfDay::classify(start),
        },
        None => ResolvedTimes {
            end_time: None,
            time_of_day: None,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub knowledge_area: KnowledgeArea,
    pub term: Term,
    pub start_time: Option<NaiveTime>,
    pub duration: LessonDuration,
    pub end_time: Option<NaiveTime>,
    pub time_of_day: Option<TimeOfDay>,
    #[serde(with = "weekday::as_short_codes")]
    pub days: Vec<Weekday>,
    pub venue_preference: Venue,
    pub approved: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LessonRequest {
    /// Re-derives `end_time` and `time_of_day`; call before every write.
    pub fn recompute(&mut self) {
        let resolved = resolve_times(self.start_time, self.duration);
        self.end_time = resolved.end_time;
        self.time_of_day = resolved.time_of_day;
    }

    pub fn time_range(&self) -> String {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format_range(start, end),
            _ => "No time set".to_string(),
        }
    }

    pub fn formatted_days(&self) -> String {
        self.days
            .iter()
            .map(|day| weekday::full_name(*day))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A request ready to be persisted. `duration` is optional at this level so
/// that a missing duration reaches the store and is rejected there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLessonRequest {
    pub knowledge_area: KnowledgeArea,
    pub term: Term,
    pub start_time: Option<NaiveTime>,
    pub duration: Option<LessonDuration>,
    #[serde(with = "weekday::as_short_codes")]
    pub days: Vec<Weekday>,
    pub venue_preference: Venue,
    pub notes: Option<String>,
}

/// Raw lesson request submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonRequestForm {
    pub knowledge_area: Option<String>,
    pub term: Option<String>,
    pub start_time: Option<String>,
    pub duration: Option<String>,
    pub days: Vec<String>,
    pub venue_preference: Option<String>,
    pub notes: Option<String>,
}

impl LessonRequestForm {
    /// Builds the form from decoded `key=value` pairs; `days` may repeat.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "knowledge_area" => form.knowledge_area = Some(value),
                "term" => form.term = Some(value),
                "start_time" => form.start_time = Some(value),
                "duration" => form.duration = Some(value),
                "days" => form.days.push(value),
                "venue_preference" => form.venue_preference = Some(value),
                "notes" => form.notes = Some(value),
                _ => {}
            }
        }
        form
    }

    pub fn validate(&self) -> Result<NewLessonRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let knowledge_area: Option<KnowledgeArea> =
            parse_choice(&mut errors, "knowledge_area", self.knowledge_area.as_deref());
        let term: Option<Term> = parse_choice(&mut errors, "term", self.term.as_deref());
        let venue_preference: Option<Venue> =
            parse_choice(&mut errors, "venue_preference", self.venue_preference.as_deref());
        let duration = parse_duration(&mut errors, self.duration.as_deref());
        let start_time = parse_start_time(&mut errors, self.start_time.as_deref());

        let mut days = Vec::new();
        if self.days.is_empty() {
            errors.add("days", REQUIRED);
        }
        for code in &self.days {
            match weekday::parse_short_code(code) {
                Some(day) if !days.contains(&day) => days.push(day),
                Some(_) => {}
                None => errors.add(
                    "days",
                    format!("Select a valid choice. {code} is not one of the available choices."),
                ),
            }
        }

        match (knowledge_area, term, venue_preference, duration, start_time) {
            (Some(knowledge_area), Some(term), Some(venue_preference), Some(duration), Some(start))
                if errors.is_empty() =>
            {
                Ok(NewLessonRequest {
                    knowledge_area,
                    term,
                    start_time: Some(start),
                    duration: Some(duration),
                    days,
                    venue_preference,
                    notes: self.notes.clone().filter(|n| !n.trim().is_empty()),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Edit of an existing request's timing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonTimesForm {
    pub start_time: Option<String>,
    pub duration: Option<String>,
}

impl LessonTimesForm {
    /// A blank start time clears it; the duration stays mandatory.
    pub fn validate(&self) -> Result<(Option<NaiveTime>, LessonDuration), FieldErrors> {
        let mut errors = FieldErrors::new();
        let duration = parse_duration(&mut errors, self.duration.as_deref());
        let start_time = match self.start_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => parse_start_time(&mut errors, Some(raw)),
        };
        match duration {
            Some(duration) if errors.is_empty() => Ok((start_time, duration)),
            _ => Err(errors),
        }
    }
}

fn parse_choice<T: std::str::FromStr>(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<&str>,
) -> Option<T> {
    match raw.map(str::trim) {
        None | Some("") => {
            errors.add(field, REQUIRED);
            None
        }
        Some(value) => match value.parse() {
            Ok(choice) => Some(choice),
            Err(_) => {
                errors.add(
                    field,
                    format!("Select a valid choice. {value} is not one of the available choices."),
                );
                None
            }
        },
    }
}

fn parse_duration(errors: &mut FieldErrors, raw: Option<&str>) -> Option<LessonDuration> {
    match raw.map(str::trim) {
        None | Some("") => {
            errors.add("duration", REQUIRED);
            None
        }
        Some(value) => match value.parse::<i32>().ok().map(LessonDuration::try_from) {
            Some(Ok(duration)) => Some(duration),
            _ => {
                errors.add(
                    "duration",
                    format!("Select a valid choice. {value} is not one of the available choices."),
                );
                None
            }
        },
    }
}

fn parse_start_time(errors: &mut FieldErrors, raw: Option<&str>) -> Option<NaiveTime> {
    match raw.map(str::trim) {
        None | Some("") => {
            errors.add("start_time", REQUIRED);
            None
        }
        Some(value) => match parse_clock_time(value) {
            Some(time) if START_WINDOW.contains(&time.num_seconds_from_midnight()) => Some(time),
            Some(_) => {
                errors.add("start_time", "The start time must be between 08:00 and 20:00.");
                None
            }
            None => {
                errors.add("start_time", "Enter a valid time.");
                None
            }
        },
    }
}
