use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
};
use std::sync::Arc;

use crate::services::auth::AuthError;

/// Пользователь, определенный по mock Bearer-токену.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

/// Токен из заголовка `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// Bearer auth extractor
impl FromRequestParts<Arc<crate::AppState>> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = || (StatusCode::UNAUTHORIZED, "Требуется авторизация".to_string());

        let token = bearer_token(&parts.headers).ok_or_else(unauthorized)?;

        // Находим пользователя по токену, без искусственной задержки профиля
        let user_id = crate::models::user::user_id_from_token(token).ok_or_else(unauthorized)?;
        let user = state
            .auth
            .find_user(user_id)
            .await
            .map_err(|e| match e {
                AuthError::Storage(e) => {
                    tracing::error!("auth lookup storage error: {:?}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Ошибка хранилища".to_string())
                }
                _ => unauthorized(),
            })?
            .ok_or_else(unauthorized)?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            email: user.email,
        })
    }
}
