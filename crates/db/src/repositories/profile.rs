use crate::models::DbTutorProfile;
use eyre::Result;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Returns the tutor's profile, creating an empty one on first access.
/// Concurrent first accesses converge on the same row.
pub async fn get_or_create_profile(pool: &Pool<Postgres>, tutor_id: Uuid) -> Result<DbTutorProfile> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO tutor_profiles (id, tutor_id, hourly_rate, subjects)
        VALUES ($1, $2, NULL, '{}')
        ON CONFLICT (tutor_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(tutor_id)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        tracing::debug!("Created empty profile for tutor {}", tutor_id);
    }

    let row = sqlx::query_as::<_, DbTutorProfile>(
        r#"
        SELECT id, tutor_id, hourly_rate, subjects
        FROM tutor_profiles
        WHERE tutor_id = $1
        "#,
    )
    .bind(tutor_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Reads the profile without creating it.
pub async fn find_profile(pool: &Pool<Postgres>, tutor_id: Uuid) -> Result<Option<DbTutorProfile>> {
    let row = sqlx::query_as::<_, DbTutorProfile>(
        r#"
        SELECT id, tutor_id, hourly_rate, subjects
        FROM tutor_profiles
        WHERE tutor_id = $1
        "#,
    )
    .bind(tutor_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn set_hourly_rate(pool: &Pool<Postgres>, tutor_id: Uuid, rate: Decimal) -> Result<DbTutorProfile> {
    get_or_create_profile(pool, tutor_id).await?;

    let row = sqlx::query_as::<_, DbTutorProfile>(
        r#"
        UPDATE tutor_profiles
        SET hourly_rate = $2
        WHERE tutor_id = $1
        RETURNING id, tutor_id, hourly_rate, subjects
        "#,
    )
    .bind(tutor_id)
    .bind(rate)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Overwrites the subject list; an empty list is allowed.
pub async fn set_subjects(pool: &Pool<Postgres>, tutor_id: Uuid, subjects: &[String]) -> Result<DbTutorProfile> {
    get_or_create_profile(pool, tutor_id).await?;

    let row = sqlx::query_as::<_, DbTutorProfile>(
        r#"
        UPDATE tutor_profiles
        SET subjects = $2
        WHERE tutor_id = $1
        RETURNING id, tutor_id, hourly_rate, subjects
        "#,
    )
    .bind(tutor_id)
    .bind(subjects)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Appends one subject without checking for duplicates.
pub async fn add_subject(pool: &Pool<Postgres>, tutor_id: Uuid, subject: &str) -> Result<DbTutorProfile> {
    get_or_create_profile(pool, tutor_id).await?;

    let row = sqlx::query_as::<_, DbTutorProfile>(
        r#"
        UPDATE tutor_profiles
        SET subjects = array_append(subjects, $2)
        WHERE tutor_id = $1
        RETURNING id, tutor_id, hourly_rate, subjects
        "#,
    )
    .bind(tutor_id)
    .bind(subject)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
