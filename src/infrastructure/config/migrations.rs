use anyhow::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Uniqueness of username and email lives in the schema as well as in
/// validation; the constraint closes the race between the lookup and the
/// insert.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<()> {
    info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            firstname VARCHAR(50) NOT NULL,
            lastname VARCHAR(50) NOT NULL,
            username VARCHAR(25) NOT NULL UNIQUE,
            dob DATE NOT NULL,
            email VARCHAR(120) NOT NULL UNIQUE,
            kin_email VARCHAR(120) NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            join_date TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id BIGSERIAL PRIMARY KEY,
            date TIMESTAMPTZ NOT NULL,
            title VARCHAR(100),
            content TEXT NOT NULL,
            user_id BIGINT NOT NULL REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database migrations completed successfully");

    Ok(())
}
