use crate::error::CoreError;
use crate::models::User;
use crate::repository::{sole, SqliteRepository};
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

#[async_trait]
impl super::UserRepository for SqliteRepository {
    async fn find_or_create_user(&self, login: &str, name: Option<&str>) -> Result<User, CoreError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(CoreError::InvalidInput("Login cannot be empty".to_string()));
        }

        let inserted = sqlx::query(
            r#"INSERT INTO users (login, name, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (login) DO NOTHING"#,
        )
        .bind(login)
        .bind(name)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        if inserted.rows_affected() > 0 {
            debug!(login, "created user");
        }

        self.find_user_by_login(login).await
    }

    async fn find_user_by_login(&self, login: &str) -> Result<User, CoreError> {
        let rows: Vec<User> = sqlx::query_as("SELECT * FROM users WHERE login = $1 LIMIT 2")
            .bind(login)
            .fetch_all(self.pool())
            .await?;
        sole(rows, || format!("User '{}' not found", login))
    }

    async fn update_user_email(&self, user_id: i64, email: Option<&str>) -> Result<User, CoreError> {
        let email = email.map(str::trim).filter(|e| !e.is_empty());

        let user: Option<User> = sqlx::query_as(
            r#"UPDATE users
            SET email = $1, updated_at = $2
            WHERE id = $3
            RETURNING *"#,
        )
        .bind(email)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        let user =
            user.ok_or_else(|| CoreError::NotFound(format!("User with id {} not found", user_id)))?;
        debug!(user_id, cleared = email.is_none(), "updated user email");
        Ok(user)
    }
}
