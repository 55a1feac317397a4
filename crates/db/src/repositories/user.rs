use crate::models::DbUser;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use tutorsync_core::models::user::{NewUser, Role};
use uuid::Uuid;

pub async fn create_user(pool: &Pool<Postgres>, user: &NewUser) -> Result<DbUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, username={}, role={}", id, user.username, user.role);

    let row = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, username, first_name, last_name, email, role, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, username, first_name, last_name, email, role, created_at
        "#,
    )
    .bind(id)
    .bind(&user.username)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(user.role.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let row = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, first_name, last_name, email, role, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_users_by_role(pool: &Pool<Postgres>, role: Role) -> Result<Vec<DbUser>> {
    let rows = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, first_name, last_name, email, role, created_at
        FROM users
        WHERE role = $1
        ORDER BY last_name ASC, first_name ASC, username ASC
        "#,
    )
    .bind(role.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
