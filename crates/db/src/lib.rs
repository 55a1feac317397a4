pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

use eyre::Result;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tutorsync_core::errors::TutorError;

pub use store::{PgStore, Store};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Maps a repository failure onto the domain taxonomy. Constraint violations
/// become [`TutorError::Integrity`]; everything else stays a database error.
pub fn classify_error(report: eyre::Report) -> TutorError {
    let violation = report
        .downcast_ref::<sqlx::Error>()
        .and_then(sqlx::Error::as_database_error)
        .filter(|db_err| {
            matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            )
        })
        .map(|db_err| db_err.message().to_string());

    match violation {
        Some(message) => {
            tracing::warn!("Rejected write: {}", message);
            TutorError::Integrity(message)
        }
        None => TutorError::Database(report),
    }
}
