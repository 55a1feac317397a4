use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username VARCHAR(30) NOT NULL UNIQUE,
            first_name VARCHAR(50) NOT NULL,
            last_name VARCHAR(50) NOT NULL,
            email VARCHAR(254) NOT NULL UNIQUE,
            role VARCHAR(10) NOT NULL DEFAULT 'Student',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create lesson_requests table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lesson_requests (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            knowledge_area VARCHAR(20) NOT NULL,
            term VARCHAR(20) NOT NULL,
            start_time TIME NULL,
            duration INTEGER NOT NULL,
            end_time TIME NULL,
            time_of_day VARCHAR(10) NULL,
            days TEXT[] NOT NULL,
            venue_preference VARCHAR(10) NOT NULL,
            approved BOOLEAN NOT NULL DEFAULT FALSE,
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_duration CHECK (duration IN (30, 60, 90, 120)),
            CONSTRAINT days_not_empty CHECK (cardinality(days) > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create meetings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meetings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tutor_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            student_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date DATE NOT NULL,
            day VARCHAR(3) NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            time_of_day VARCHAR(10) NOT NULL,
            topic VARCHAR(200) NOT NULL,
            status VARCHAR(10) NOT NULL DEFAULT 'scheduled',
            notes TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create tutor_availability table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tutor_availability (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tutor_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            day VARCHAR(10) NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            CONSTRAINT unique_tutor_window UNIQUE (tutor_id, day, start_time, end_time),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create tutor_profiles table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tutor_profiles (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tutor_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            hourly_rate NUMERIC(6, 2) NULL,
            subjects TEXT[] NOT NULL DEFAULT '{}',
            CONSTRAINT non_negative_rate CHECK (hourly_rate IS NULL OR hourly_rate >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)",
        "CREATE INDEX IF NOT EXISTS idx_lesson_requests_student_id ON lesson_requests(student_id)",
        "CREATE INDEX IF NOT EXISTS idx_meetings_tutor_id_date ON meetings(tutor_id, date)",
        "CREATE INDEX IF NOT EXISTS idx_meetings_student_id ON meetings(student_id)",
        "CREATE INDEX IF NOT EXISTS idx_tutor_availability_tutor_id ON tutor_availability(tutor_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
