use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed session token.
    pub token: String,
    /// Username of the authenticated user.
    pub user: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serialization() {
        let response = PublicUser {
            id: 1,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("alice@x.com"));
        assert!(json.contains("\"id\":1"));
    }

    #[test]
    fn login_response_serialization() {
        let response = LoginResponse {
            token: "abc.def.ghi".to_string(),
            user: "alice".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"token\":\"abc.def.ghi\""));
        assert!(json.contains("\"user\":\"alice\""));
    }
}
