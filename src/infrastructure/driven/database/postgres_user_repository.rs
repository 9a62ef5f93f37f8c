use async_trait::async_trait;
use anyhow::{anyhow, Result};
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::domain::entities::user::{NewUser, User};
use crate::domain::repositories::user_repository::UserRepository;

const USER_COLUMNS: &str =
    "id, firstname, lastname, username, dob, email, kin_email, password_hash, join_date";

pub struct PostgresUserRepository {
    pool: Arc<Pool<Postgres>>,
}

impl PostgresUserRepository {
    pub fn new(pool: Arc<Pool<Postgres>>) -> Self {
        Self { pool }
    }

    async fn find_by(&self, column: &str, value: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let result = sqlx::query_as::<_, User>(&query)
            .bind(value)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User> {
        let result = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (firstname, lastname, username, dob, email, kin_email, password_hash, join_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.username)
        .bind(user.dob)
        .bind(&user.email)
        .bind(&user.kin_email)
        .bind(&user.password_hash)
        .bind(user.join_date)
        .fetch_one(&*self.pool)
        .await?;

        Ok(result)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;
        Ok(result)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_by("email", email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_by("username", username).await
    }

    async fn find_by_kin_email(&self, kin_email: &str) -> Result<Option<User>> {
        self.find_by("kin_email", kin_email).await
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let result = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&*self.pool)
        .await?;
        Ok(result)
    }

    async fn update_profile(&self, id: i64, username: &str, kin_email: &str) -> Result<User> {
        let result = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = $1, kin_email = $2
            WHERE id = $3
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(username)
        .bind(kin_email)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        result.ok_or_else(|| anyhow!("user {} not found", id))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&*self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("user {} not found", id));
        }
        Ok(())
    }
}
