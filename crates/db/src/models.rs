use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::{eyre, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use tutorsync_core::models::{
    availability::AvailabilityWindow,
    lesson::{LessonDuration, LessonRequest},
    meeting::{Meeting, MeetingDetail},
    profile::TutorProfile,
    time::TimeOfDay,
    user::{Role, User},
    weekday,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLessonRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub knowledge_area: String,
    pub term: String,
    pub start_time: Option<NaiveTime>,
    pub duration: i32,
    pub end_time: Option<NaiveTime>,
    pub time_of_day: Option<String>,
    pub days: Vec<String>,
    pub venue_preference: String,
    pub approved: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMeeting {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub day: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time_of_day: String,
    pub topic: String,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Meeting row joined with both participants' names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMeetingDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meeting: DbMeeting,
    pub tutor_name: String,
    pub student_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailability {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub day: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTutorProfile {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub hourly_rate: Option<Decimal>,
    pub subjects: Vec<String>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            role: Role::from_stored(&row.role),
            created_at: row.created_at,
        }
    }
}

fn parse_stored<T: std::str::FromStr<Err = String>>(value: &str) -> Result<T> {
    value.parse().map_err(|e: String| eyre!("Corrupt stored value: {}", e))
}

impl TryFrom<DbLessonRequest> for LessonRequest {
    type Error = eyre::Report;

    fn try_from(row: DbLessonRequest) -> Result<Self> {
        let days = row
            .days
            .iter()
            .map(|code| {
                weekday::parse_short_code(code).ok_or_else(|| eyre!("Corrupt stored day code: {}", code))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LessonRequest {
            id: row.id,
            student_id: row.student_id,
            knowledge_area: parse_stored(&row.knowledge_area)?,
            term: parse_stored(&row.term)?,
            start_time: row.start_time,
            duration: LessonDuration::try_from(row.duration).map_err(|e| eyre!(e))?,
            end_time: row.end_time,
            time_of_day: row.time_of_day.as_deref().map(parse_stored::<TimeOfDay>).transpose()?,
            days,
            venue_preference: parse_stored(&row.venue_preference)?,
            approved: row.approved,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbMeeting> for Meeting {
    type Error = eyre::Report;

    fn try_from(row: DbMeeting) -> Result<Self> {
        Ok(Meeting {
            id: row.id,
            tutor_id: row.tutor_id,
            student_id: row.student_id,
            date: row.date,
            day: weekday::parse_short_code(&row.day)
                .ok_or_else(|| eyre!("Corrupt stored day code: {}", row.day))?,
            start_time: row.start_time,
            end_time: row.end_time,
            time_of_day: parse_stored(&row.time_of_day)?,
            topic: row.topic,
            status: parse_stored(&row.status)?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<DbMeetingDetail> for MeetingDetail {
    type Error = eyre::Report;

    fn try_from(row: DbMeetingDetail) -> Result<Self> {
        Ok(MeetingDetail {
            meeting: row.meeting.try_into()?,
            tutor_name: row.tutor_name,
            student_name: row.student_name,
        })
    }
}

impl TryFrom<DbAvailability> for AvailabilityWindow {
    type Error = eyre::Report;

    fn try_from(row: DbAvailability) -> Result<Self> {
        Ok(AvailabilityWindow {
            id: row.id,
            tutor_id: row.tutor_id,
            day: weekday::parse_full_name(&row.day)
                .ok_or_else(|| eyre!("Corrupt stored weekday: {}", row.day))?,
            start_time: row.start_time,
            end_time: row.end_time,
            is_available: row.is_available,
        })
    }
}

impl From<DbTutorProfile> for TutorProfile {
    fn from(row: DbTutorProfile) -> Self {
        TutorProfile {
            tutor_id: row.tutor_id,
            hourly_rate: row.hourly_rate,
            subjects: row.subjects,
        }
    }
}

/// Converts a batch of rows, failing on the first corrupt one.
pub fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = eyre::Report>,
{
    rows.into_iter().map(T::try_from).collect()
}
