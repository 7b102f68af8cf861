use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{booking_error, selection_error};
use crate::models::NewBooking;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", get(get_user_bookings))
        .route("/bookings", post(create_booking))
        .route("/bookings/cancel", patch(cancel_booking))
        .route("/bookings/{booking_id}", get(get_booking))
}

/* ---------- BOOKINGS ---------- */

// POST /api/bookings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingRequest {
    pub movie_id: i64,
    pub showtime_id: i64,
    pub cinema_name: String,
    pub movie_title: String,
    pub date: String,
    pub time: String,
    pub seats: Vec<String>,
    #[serde(default)]
    pub total_price: u64,
    // если зал указан, места проверяются по схеме и цена считается на сервере
    #[serde(default)]
    pub room_id: Option<i64>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: crate::middleware::AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.seats.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Не выбрано ни одного места".to_string()));
    }

    let total_price = match req.room_id {
        Some(room_id) => {
            let map = state
                .seat_maps
                .get_by_room_id(room_id)
                .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Зал {} не найден", room_id)))?;
            map.quote(&req.seats).map_err(selection_error)?
        }
        None => req.total_price,
    };

    let booking = state
        .bookings
        .create_booking(NewBooking {
            user_id: Some(user.user_id),
            movie_id: req.movie_id,
            showtime_id: req.showtime_id,
            cinema_name: req.cinema_name,
            movie_title: req.movie_title,
            date: req.date,
            time: req.time,
            seats: req.seats,
            total_price,
        })
        .await
        .map_err(booking_error)?;

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings
async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    user: crate::middleware::AuthUser,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let bookings = state
        .bookings
        .get_user_bookings(user.user_id)
        .await
        .map_err(booking_error)?;
    Ok(Json(bookings))
}

// GET /api/bookings/{booking_id}
async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let booking = state
        .bookings
        .get_booking_by_id(&booking_id)
        .await
        .map_err(booking_error)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Бронирование {} не найдено", booking_id)))?;
    Ok(Json(booking))
}

// PATCH /api/bookings/cancel
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelBookingRequest {
    pub booking_id: String,
}

async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: crate::middleware::AuthUser,
    Json(req): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // проверка владельца
    let booking = state
        .bookings
        .get_booking_by_id(&req.booking_id)
        .await
        .map_err(booking_error)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Бронирование {} не найдено", req.booking_id)))?;
    if booking.user_id != Some(user.user_id) {
        tracing::warn!(
            "user {} tried to cancel booking {} of another user",
            user.user_id,
            req.booking_id
        );
        return Err((StatusCode::FORBIDDEN, "Бронирование не принадлежит вам".to_string()));
    }

    let cancelled = state
        .bookings
        .cancel_booking(&req.booking_id)
        .await
        .map_err(booking_error)?;
    Ok(Json(cancelled))
}
