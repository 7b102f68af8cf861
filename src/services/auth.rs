//! auth.rs
//!
//! Mock-сервис авторизации поверх key-value хранилища.
//!
//! Пользователи хранятся JSON-массивом под ключом `mock_users`, токены -
//! строки вида `mock_access_token_<id>`. Задержки имитируют сетевой вызов.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};
use validator::Validate;

use crate::config::AuthConfig;
use crate::models::user::user_id_from_token;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, StoredUser, User};
use crate::store::{Store, StoreError};

pub const USERS_KEY: &str = "mock_users";
pub const DEFAULT_ROLE: &str = "CUSTOMER";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Username or Email already exists")]
    AccountAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("invalid registration data: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Искусственные задержки операций.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockLatency {
    pub login: Duration,
    pub register: Duration,
    pub profile: Duration,
}

impl From<&AuthConfig> for MockLatency {
    fn from(config: &AuthConfig) -> Self {
        Self {
            login: Duration::from_millis(config.login_delay_ms),
            register: Duration::from_millis(config.register_delay_ms),
            profile: Duration::from_millis(config.profile_delay_ms),
        }
    }
}

#[derive(Clone)]
pub struct MockAuthService {
    store: Store,
    latency: MockLatency,
    write_lock: Arc<Mutex<()>>,
}

impl MockAuthService {
    pub fn new(store: Store, latency: MockLatency) -> Self {
        Self {
            store,
            latency,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn login(&self, credentials: LoginRequest) -> Result<AuthResponse, AuthError> {
        simulate_delay(self.latency.login).await;

        let users = self.users().await?;
        let user = users
            .into_iter()
            .find(|u| {
                u.matches_login(&credentials.username_or_email)
                    && u.verify_password(&credentials.password)
            })
            .ok_or_else(|| {
                warn!("Failed login for {}", credentials.username_or_email);
                AuthError::InvalidCredentials
            })?;

        info!("User {} logged in", user.user.id);
        Ok(AuthResponse::for_user(user.user))
    }

    pub async fn register(&self, data: RegisterRequest) -> Result<AuthResponse, AuthError> {
        simulate_delay(self.latency.register).await;
        data.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut users = self.users().await?;
        if users
            .iter()
            .any(|u| u.user.username == data.username || u.user.email == data.email)
        {
            return Err(AuthError::AccountAlreadyExists);
        }

        // id - время регистрации в мс, но строго больше последнего выданного
        let last_id = users.iter().map(|u| u.user.id).max().unwrap_or(0);
        let id = Utc::now().timestamp_millis().max(last_id + 1);

        let user = User {
            id,
            username: data.username,
            email: data.email,
            full_name: data.full_name,
            phone: data.phone,
            roles: vec![DEFAULT_ROLE.to_string()],
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash: StoredUser::hash_password(&data.password),
        });
        self.store.set_list(USERS_KEY, &users).await?;

        info!("Registered user {} ({})", user.id, user.username);
        Ok(AuthResponse::for_user(user))
    }

    pub async fn get_profile(&self, access_token: &str) -> Result<User, AuthError> {
        simulate_delay(self.latency.profile).await;

        let user_id = user_id_from_token(access_token).ok_or(AuthError::UserNotFound)?;
        self.find_user(user_id).await?.ok_or(AuthError::UserNotFound)
    }

    pub async fn find_user(&self, user_id: i64) -> Result<Option<User>, AuthError> {
        Ok(self
            .users()
            .await?
            .into_iter()
            .find(|u| u.user.id == user_id)
            .map(|u| u.user))
    }

    async fn users(&self) -> Result<Vec<StoredUser>, StoreError> {
        self.store.get_list(USERS_KEY).await
    }
}

async fn simulate_delay(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
