use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Role of a user in the platform. Stored for display; nothing checks it
/// when authorizing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum UserRole {
    Student,
    Instructor,
    Admin,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email_address: String,
    pub fullname: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 PHC string, not exposed in JSON
    pub user_role: UserRole,
    #[serde(skip_serializing)]
    pub session_token: Option<String>, // set on login, overwritten by the next login
    pub created_at: OffsetDateTime,
}
