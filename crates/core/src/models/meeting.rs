use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::{format_range, parse_clock_time, TimeOfDay};
use super::weekday;
use crate::errors::FieldErrors;

pub const TOPIC_MAX_LEN: usize = 200;

text_choices! {
    MeetingStatus {
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl Default for MeetingStatus {
    fn default() -> Self {
        MeetingStatus::Scheduled
    }
}

/// A confirmed session between one tutor and one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "weekday::as_short_code")]
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time_of_day: TimeOfDay,
    pub topic: String,
    pub status: MeetingStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meeting {
    pub fn time_range(&self) -> String {
        format_range(self.start_time, self.end_time)
    }

    /// Only the meeting's own student or tutor may touch its notes.
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.tutor_id == user_id || self.student_id == user_id
    }
}

/// Meeting joined with the display names of both participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingDetail {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub tutor_name: String,
    pub student_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeeting {
    pub tutor_id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "weekday::as_short_code")]
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time_of_day: TimeOfDay,
    pub topic: String,
    pub status: MeetingStatus,
    pub notes: String,
}

/// Raw scheduling form as posted by an admin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSessionForm {
    pub tutor_id: Option<String>,
    pub date: Option<String>,
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub time_of_day: Option<String>,
    pub topic: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl ScheduleSessionForm {
    /// Checks the submission field by field and builds the meeting for
    /// `student_id`.
    ///
    /// `day` defaults to the weekday of `date` and `time_of_day` to the
    /// classification of `start_time` (`morning` when it has none). Whether
    /// `tutor_id` names a tutor is checked by the caller, which owns the
    /// user lookup.
    pub fn validate(&self, student_id: Uuid) -> Result<NewMeeting, FieldErrors> {
        let mut errors = FieldErrors::new();

        let tutor_id = match non_blank(&self.tutor_id) {
            None => {
                errors.add("tutor_id", "This field is required.");
                None
            }
            Some(raw) => Uuid::parse_str(raw)
                .map_err(|_| errors.add("tutor_id", "Select a valid tutor."))
                .ok(),
        };

        let date = match non_blank(&self.date) {
            None => {
                errors.add("date", "This field is required.");
                None
            }
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| errors.add("date", "Enter a valid date."))
                .ok(),
        };

        let start_time = required_time(&mut errors, "start_time", &self.start_time);
        let end_time = required_time(&mut errors, "end_time", &self.end_time);
        if let (Some(start), Some(end)) = (start_time, end_time) {
            if end <= start {
                errors.add("end_time", "End time must be after start time.");
            }
        }

        let day = match non_blank(&self.day) {
            None => date.map(|d| d.weekday()),
            Some(raw) => weekday::parse_short_code(raw).or_else(|| {
                errors.add("day", format!("Select a valid choice. {raw} is not one of the available choices."));
                None
            }),
        };

        let time_of_day = match non_blank(&self.time_of_day) {
            None => start_time.map(|t| TimeOfDay::classify(t).unwrap_or(TimeOfDay::Morning)),
            Some(raw) => raw.parse::<TimeOfDay>().map_err(|e| errors.add("time_of_day", e)).ok(),
        };

        let topic = match non_blank(&self.topic) {
            None => {
                errors.add("topic", "This field is required.");
                None
            }
            Some(raw) if raw.chars().count() > TOPIC_MAX_LEN => {
                errors.add(
                    "topic",
                    format!("Ensure this value has at most {TOPIC_MAX_LEN} characters."),
                );
                None
            }
            Some(raw) => Some(raw.to_string()),
        };

        let status = match non_blank(&self.status) {
            None => Some(MeetingStatus::default()),
            Some(raw) => raw.parse::<MeetingStatus>().map_err(|e| errors.add("status", e)).ok(),
        };

        match (tutor_id, date, day, start_time, end_time, time_of_day, topic, status) {
            (
                Some(tutor_id),
                Some(date),
                Some(day),
                Some(start_time),
                Some(end_time),
                Some(time_of_day),
                Some(topic),
                Some(status),
            ) if errors.is_empty() => Ok(NewMeeting {
                tutor_id,
                student_id,
                date,
                day,
                start_time,
                end_time,
                time_of_day,
                topic,
                status,
                notes: self.notes.clone().unwrap_or_default(),
            }),
            _ => Err(errors),
        }
    }
}

/// Notes edit posted from the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonNotesForm {
    pub lesson_id: Uuid,
    #[serde(default)]
    pub notes: String,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required_time(errors: &mut FieldErrors, field: &str, value: &Option<String>) -> Option<NaiveTime> {
    match non_blank(value) {
        None => {
            errors.add(field, "This field is required.");
            None
        }
        Some(raw) => parse_clock_time(raw).or_else(|| {
            errors.add(field, "Enter a valid time.");
            None
        }),
    }
}
