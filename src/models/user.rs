use serde::{Deserialize, Serialize};

/// Account record as the service sees it. The password field always holds a
/// bcrypt hash, never the submitted password.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: String,  // PRIMARY IDENTIFIER - 24-hex ObjectId string
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.user_id.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Emails are matched case-insensitively, so they are stored normalized.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
