use crate::models::{DbMeeting, DbMeetingDetail};
use chrono::{Datelike, NaiveDate, Utc};
use eyre::{eyre, Result};
use sqlx::{Pool, Postgres};
use tutorsync_core::models::meeting::NewMeeting;
use tutorsync_core::models::weekday;
use uuid::Uuid;

const COLUMNS: &str = "id, tutor_id, student_id, date, day, start_time, end_time, time_of_day, \
                       topic, status, notes, created_at, updated_at";

const DETAIL_SELECT: &str = r#"
    SELECT m.id, m.tutor_id, m.student_id, m.date, m.day, m.start_time, m.end_time,
           m.time_of_day, m.topic, m.status, m.notes, m.created_at, m.updated_at,
           t.first_name || ' ' || t.last_name AS tutor_name,
           s.first_name || ' ' || s.last_name AS student_name
    FROM meetings m
    JOIN users t ON t.id = m.tutor_id
    JOIN users s ON s.id = m.student_id
"#;

/// Inserts the meeting and deletes the lesson request it came from, if any,
/// in one transaction. Deleting an already-removed request is a no-op.
pub async fn create_meeting(
    pool: &Pool<Postgres>,
    meeting: &NewMeeting,
    retire_request: Option<Uuid>,
) -> Result<DbMeeting> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, DbMeeting>(&format!(
        r#"
        INSERT INTO meetings
            (id, tutor_id, student_id, date, day, start_time, end_time, time_of_day,
             topic, status, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(meeting.tutor_id)
    .bind(meeting.student_id)
    .bind(meeting.date)
    .bind(weekday::short_code(meeting.day))
    .bind(meeting.start_time)
    .bind(meeting.end_time)
    .bind(meeting.time_of_day.as_str())
    .bind(&meeting.topic)
    .bind(meeting.status.as_str())
    .bind(&meeting.notes)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(request_id) = retire_request {
        let removed = sqlx::query("DELETE FROM lesson_requests WHERE id = $1")
            .bind(request_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tracing::debug!("Retired lesson request {} ({} rows)", request_id, removed);
    }

    tx.commit().await?;

    tracing::debug!(
        "Meeting created: id={}, tutor_id={}, student_id={}, date={}",
        row.id, row.tutor_id, row.student_id, row.date
    );
    Ok(row)
}

pub async fn get_meeting_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbMeeting>> {
    let row = sqlx::query_as::<_, DbMeeting>(&format!(
        "SELECT {COLUMNS} FROM meetings WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn update_meeting_notes(pool: &Pool<Postgres>, id: Uuid, notes: &str) -> Result<Option<DbMeeting>> {
    let row = sqlx::query_as::<_, DbMeeting>(&format!(
        r#"
        UPDATE meetings
        SET notes = $2, updated_at = $3
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(notes)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// A tutor's meetings dated inside `year`/`month`, by date then start time.
pub async fn get_tutor_meetings_for_month(
    pool: &Pool<Postgres>,
    tutor_id: Uuid,
    year: i32,
    month: u32,
) -> Result<Vec<DbMeetingDetail>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| eyre!("Invalid month {}-{}", year, month))?;
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| eyre!("Month {}-{} has no successor", year, month))?;

    let rows = sqlx::query_as::<_, DbMeetingDetail>(&format!(
        r#"
        {DETAIL_SELECT}
        WHERE m.tutor_id = $1 AND m.date >= $2 AND m.date < $3
        ORDER BY m.date ASC, m.start_time ASC
        "#
    ))
    .bind(tutor_id)
    .bind(first)
    .bind(next)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Meetings filtered by participant; `None` filters match everything.
pub async fn get_meeting_details(
    pool: &Pool<Postgres>,
    student_id: Option<Uuid>,
    tutor_id: Option<Uuid>,
) -> Result<Vec<DbMeetingDetail>> {
    let rows = sqlx::query_as::<_, DbMeetingDetail>(&format!(
        r#"
        {DETAIL_SELECT}
        WHERE ($1::uuid IS NULL OR m.student_id = $1)
          AND ($2::uuid IS NULL OR m.tutor_id = $2)
        ORDER BY m.date ASC, m.start_time ASC
        "#
    ))
    .bind(student_id)
    .bind(tutor_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
