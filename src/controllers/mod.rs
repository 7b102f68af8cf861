pub mod rooms;
pub mod auth;
pub mod bookings;

use axum::{http::StatusCode, Router};
use std::sync::Arc;

use crate::models::SeatSelectionError;
use crate::services::{auth::AuthError, booking::BookingError};
use crate::store::StoreError;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(rooms::routes())
        .merge(auth::routes())
        .merge(bookings::routes())
}

/* ---------- error mapping ---------- */

pub(crate) type ApiError = (StatusCode, String);

fn storage_error(e: &StoreError) -> ApiError {
    tracing::error!("storage error: {:?}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Ошибка хранилища".to_string())
}

pub(crate) fn auth_error(e: AuthError) -> ApiError {
    match e {
        AuthError::InvalidCredentials | AuthError::UserNotFound => {
            (StatusCode::UNAUTHORIZED, e.to_string())
        }
        AuthError::AccountAlreadyExists => (StatusCode::CONFLICT, e.to_string()),
        AuthError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        AuthError::Storage(ref e) => storage_error(e),
    }
}

pub(crate) fn booking_error(e: BookingError) -> ApiError {
    match e {
        BookingError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        BookingError::Storage(ref e) => storage_error(e),
    }
}

// 409 только для занятого места, остальное - ошибка запроса
pub(crate) fn selection_error(e: SeatSelectionError) -> ApiError {
    let status = match e {
        SeatSelectionError::SeatOccupied(_) => StatusCode::CONFLICT,
        SeatSelectionError::EmptySelection
        | SeatSelectionError::UnknownSeat(_)
        | SeatSelectionError::DuplicateSeat(_) => StatusCode::BAD_REQUEST,
    };
    (status, e.to_string())
}
