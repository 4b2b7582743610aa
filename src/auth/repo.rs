use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{User, UserRole};

const USER_COLUMNS: &str =
    "id, username, email_address, fullname, password_hash, user_role, session_token, created_at";

impl User {
    /// Find a user by email address. Exact match, case-sensitive.
    pub async fn find_by_email(db: &PgPool, email_address: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email_address = $1",
        ))
        .bind(email_address)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by username. Exact match, case-sensitive.
    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1",
        ))
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find the user holding the given session token.
    pub async fn find_by_session_token(db: &PgPool, token: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE session_token = $1",
        ))
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC",
        ))
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// Create a new user with an already-hashed password. The caller hashes
    /// exactly once, at registration; nothing here re-hashes on save.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email_address: &str,
        fullname: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email_address, fullname, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(username)
        .bind(email_address)
        .bind(fullname)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Replace the user's session token. The unique index on session_token
    /// turns a token collision into an error here instead of silently
    /// overwriting another user's session.
    pub async fn set_session_token(db: &PgPool, id: Uuid, token: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET session_token = $2
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(token)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Partial profile update. None fields keep their current value.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        username: Option<&str>,
        fullname: Option<&str>,
        user_role: Option<UserRole>,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                fullname = COALESCE($3, fullname),
                user_role = COALESCE($4, user_role)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(username)
        .bind(fullname)
        .bind(user_role)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Hard delete. Returns true iff a row was removed.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// True when the error is a Postgres unique-constraint violation (23505).
/// Concurrent registrations of the same username land here: the
/// check-then-act in the handler does not close the race, the constraint
/// does.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|db| db.code().as_deref() == Some("23505"))
        .unwrap_or(false)
}
