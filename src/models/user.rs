use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub roles: Vec<String>,
}

// Запись в хранилище: пользователь + хеш пароля, наружу не отдается
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    #[serde(flatten)]
    pub user: User,
    pub password_hash: String,
}

impl StoredUser {
    pub fn hash_password(password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash == Self::hash_password(password)
    }

    /// Совпадает ли логин с username или email пользователя.
    pub fn matches_login(&self, username_or_email: &str) -> bool {
        self.user.username == username_or_email || self.user.email == username_or_email
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

pub const ACCESS_TOKEN_PREFIX: &str = "mock_access_token_";
pub const REFRESH_TOKEN_PREFIX: &str = "mock_refresh_token_";

impl AuthResponse {
    pub fn for_user(user: User) -> Self {
        Self {
            access_token: format!("{}{}", ACCESS_TOKEN_PREFIX, user.id),
            refresh_token: format!("{}{}", REFRESH_TOKEN_PREFIX, user.id),
            user,
        }
    }
}

/// Достает id пользователя из mock access token.
pub fn user_id_from_token(access_token: &str) -> Option<i64> {
    access_token
        .strip_prefix(ACCESS_TOKEN_PREFIX)
        .and_then(|id| id.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip_user_id() {
        let user = User {
            id: 1700000000000,
            username: "neo".into(),
            email: "neo@matrix.io".into(),
            full_name: "Thomas Anderson".into(),
            phone: None,
            roles: vec!["CUSTOMER".into()],
        };
        let resp = AuthResponse::for_user(user);
        assert_eq!(resp.access_token, "mock_access_token_1700000000000");
        assert_eq!(resp.refresh_token, "mock_refresh_token_1700000000000");
        assert_eq!(user_id_from_token(&resp.access_token), Some(1700000000000));
        assert_eq!(user_id_from_token("mock_refresh_token_1"), None);
        assert_eq!(user_id_from_token("mock_access_token_abc"), None);
    }

    #[test]
    fn password_hash_never_reaches_public_json() {
        let stored = StoredUser {
            user: User {
                id: 1,
                username: "trinity".into(),
                email: "t@matrix.io".into(),
                full_name: "Trinity".into(),
                phone: Some("+84 90".into()),
                roles: vec!["CUSTOMER".into()],
            },
            password_hash: StoredUser::hash_password("secret1"),
        };
        assert!(stored.verify_password("secret1"));
        assert!(!stored.verify_password("secret2"));

        let public = serde_json::to_value(&stored.user).unwrap();
        assert!(public.get("passwordHash").is_none());
        assert_eq!(public["fullName"], "Trinity");

        let persisted = serde_json::to_value(&stored).unwrap();
        assert_eq!(persisted["username"], "trinity");
        assert!(persisted.get("passwordHash").is_some());
    }

    #[test]
    fn register_request_validation() {
        let mut req = RegisterRequest {
            username: "morpheus".into(),
            email: "morpheus@nebuchadnezzar.io".into(),
            password: "redpill".into(),
            full_name: "Morpheus".into(),
            phone: None,
        };
        assert!(req.validate().is_ok());
        req.email = "not-an-email".into();
        assert!(req.validate().is_err());
        req.email = "m@n.io".into();
        req.username = "mo".into();
        assert!(req.validate().is_err());
    }
}
