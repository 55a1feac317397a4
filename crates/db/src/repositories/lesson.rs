use crate::models::DbLessonRequest;
use chrono::{NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use tutorsync_core::models::lesson::{resolve_times, LessonDuration, NewLessonRequest};
use tutorsync_core::models::weekday;
use uuid::Uuid;

const COLUMNS: &str = "id, student_id, knowledge_area, term, start_time, duration, end_time, \
                       time_of_day, days, venue_preference, approved, notes, created_at";

/// Inserts a request with its derived end time and time of day. A request
/// without a duration is sent as-is and rejected by the NOT NULL constraint.
pub async fn create_lesson_request(
    pool: &Pool<Postgres>,
    student_id: Uuid,
    request: &NewLessonRequest,
) -> Result<DbLessonRequest> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let resolved = request
        .duration
        .map(|duration| resolve_times(request.start_time, duration));
    let days: Vec<String> = request
        .days
        .iter()
        .map(|day| weekday::short_code(*day).to_string())
        .collect();

    tracing::debug!(
        "Creating lesson request: id={}, student_id={}, start_time={:?}, duration={:?}",
        id, student_id, request.start_time, request.duration
    );

    let row = sqlx::query_as::<_, DbLessonRequest>(&format!(
        r#"
        INSERT INTO lesson_requests
            (id, student_id, knowledge_area, term, start_time, duration, end_time,
             time_of_day, days, venue_preference, approved, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, $11, $12)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(student_id)
    .bind(request.knowledge_area.as_str())
    .bind(request.term.as_str())
    .bind(request.start_time)
    .bind(request.duration.map(|d| d.minutes()))
    .bind(resolved.and_then(|r| r.end_time))
    .bind(resolved.and_then(|r| r.time_of_day).map(|t| t.as_str()))
    .bind(days)
    .bind(request.venue_preference.as_str())
    .bind(&request.notes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_lesson_request_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbLessonRequest>> {
    let row = sqlx::query_as::<_, DbLessonRequest>(&format!(
        "SELECT {COLUMNS} FROM lesson_requests WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Rewrites start time and duration, re-deriving the dependent columns in
/// the same statement. `None` when no such request exists.
pub async fn update_lesson_times(
    pool: &Pool<Postgres>,
    id: Uuid,
    start_time: Option<NaiveTime>,
    duration: LessonDuration,
) -> Result<Option<DbLessonRequest>> {
    let resolved = resolve_times(start_time, duration);

    let row = sqlx::query_as::<_, DbLessonRequest>(&format!(
        r#"
        UPDATE lesson_requests
        SET start_time = $2, duration = $3, end_time = $4, time_of_day = $5
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(start_time)
    .bind(duration.minutes())
    .bind(resolved.end_time)
    .bind(resolved.time_of_day.map(|t| t.as_str()))
    .fetch_optional(pool)
    .await?;

    if let Some(updated) = &row {
        tracing::debug!("Lesson request {} retimed: end_time={:?}", id, updated.end_time);
    }
    Ok(row)
}

/// The student's requests, oldest first, ties broken by id.
pub async fn get_lesson_requests_by_student(
    pool: &Pool<Postgres>,
    student_id: Uuid,
) -> Result<Vec<DbLessonRequest>> {
    let rows = sqlx::query_as::<_, DbLessonRequest>(&format!(
        "SELECT {COLUMNS} FROM lesson_requests WHERE student_id = $1 ORDER BY created_at ASC, id ASC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Every request in the system, most recent first.
pub async fn get_all_lesson_requests(pool: &Pool<Postgres>) -> Result<Vec<DbLessonRequest>> {
    let rows = sqlx::query_as::<_, DbLessonRequest>(&format!(
        "SELECT {COLUMNS} FROM lesson_requests ORDER BY created_at DESC, id ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
