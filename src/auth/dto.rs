use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::{User, UserRole};

/// Request body for user registration. All fields required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email_address: String,
    pub password: String,
    pub fullname: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_address: String,
    pub password: String,
}

/// Envelope returned by login on every path. `message` carries the email
/// address on success and the failure reason otherwise; `sessionToken` is
/// empty unless the login succeeded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub status_code: String,
    pub message: String,
    pub session_token: String,
}

impl LoginResponse {
    pub fn failure(status_code: &str, message: &str) -> Self {
        Self {
            status_code: status_code.into(),
            message: message.into(),
            session_token: String::new(),
        }
    }
}

/// Public part of a user returned to clients. No password, no token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email_address: String,
    pub fullname: String,
    pub user_role: UserRole,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email_address: user.email_address,
            fullname: user.fullname,
            user_role: user.user_role,
        }
    }
}

/// Partial profile update; absent fields keep their stored value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub fullname: Option<String>,
    pub user_role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email_address: "alice@x.com".into(),
            fullname: "Alice A".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".into(),
            user_role: UserRole::Student,
            session_token: Some("session_secret".into()),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn user_dto_uses_camel_case_wire_names() {
        let json = serde_json::to_string(&UserDto::from(sample_user())).unwrap();
        assert!(json.contains("\"emailAddress\":\"alice@x.com\""));
        assert!(json.contains("\"userRole\":\"STUDENT\""));
        assert!(!json.contains("password"));
        assert!(!json.contains("session"));
    }

    #[test]
    fn user_record_never_serializes_secrets() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("session_secret"));
    }

    #[test]
    fn login_response_wire_shape() {
        let ok = LoginResponse {
            status_code: "200".into(),
            message: "alice@x.com".into(),
            session_token: "session_tok".into(),
        };
        let json = serde_json::to_string(&ok).unwrap();
        assert!(json.contains("\"statusCode\":\"200\""));
        assert!(json.contains("\"sessionToken\":\"session_tok\""));

        let failed = LoginResponse::failure("401", "User not found");
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("\"sessionToken\":\"\""));
    }

    #[test]
    fn register_request_accepts_camel_case() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"alice","emailAddress":"alice@x.com","password":"pw123","fullname":"Alice A"}"#,
        )
        .unwrap();
        assert_eq!(req.email_address, "alice@x.com");
    }
}
