use crate::models::DbAvailability;
use eyre::Result;
use sqlx::{Pool, Postgres};
use tutorsync_core::models::availability::AvailabilityEntry;
use tutorsync_core::models::weekday;
use uuid::Uuid;

/// Replaces every window of `tutor_id` with `entries` in one transaction.
/// A rejected insert rolls the delete back too.
pub async fn replace_availability(
    pool: &Pool<Postgres>,
    tutor_id: Uuid,
    entries: &[AvailabilityEntry],
) -> Result<Vec<DbAvailability>> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM tutor_availability WHERE tutor_id = $1")
        .bind(tutor_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    for entry in entries {
        sqlx::query(
            r#"
            INSERT INTO tutor_availability (id, tutor_id, day, start_time, end_time, is_available)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tutor_id)
        .bind(weekday::full_name(entry.day))
        .bind(entry.start_time)
        .bind(entry.end_time)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        "Replaced availability for tutor {}: {} removed, {} created",
        tutor_id,
        removed,
        entries.len()
    );

    get_availability_by_tutor(pool, tutor_id).await
}

/// Windows ordered Monday first, then by start time.
pub async fn get_availability_by_tutor(pool: &Pool<Postgres>, tutor_id: Uuid) -> Result<Vec<DbAvailability>> {
    let rows = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT id, tutor_id, day, start_time, end_time, is_available
        FROM tutor_availability
        WHERE tutor_id = $1
        ORDER BY array_position(
                     ARRAY['Monday', 'Tuesday', 'Wednesday', 'Thursday', 'Friday', 'Saturday', 'Sunday']::varchar[],
                     day
                 ) ASC,
                 start_time ASC
        "#,
    )
    .bind(tutor_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
