use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::selection_error;
use crate::models::SeatMap;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/rooms/{room_id}/seats", get(get_seat_map))
        .route("/rooms/{room_id}/quote", post(quote_seats))
}

fn room_not_found(room_id: i64) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Зал {} не найден", room_id))
}

fn seat_map(state: &AppState, room_id: i64) -> Result<&SeatMap, (StatusCode, String)> {
    state
        .seat_maps
        .get_by_room_id(room_id)
        .ok_or_else(|| room_not_found(room_id))
}

// GET /api/rooms
async fn list_rooms(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({ "rooms": state.seat_maps.room_ids() }))
}

// GET /api/rooms/{room_id}/seats
async fn get_seat_map(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let map = seat_map(&state, room_id)?;
    Ok(Json(map.clone()))
}

// POST /api/rooms/{room_id}/quote
#[derive(Debug, Deserialize)]
struct QuoteRequest {
    pub seats: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    pub room_id: i64,
    pub seats: Vec<String>,
    pub total_price: u64,
}

async fn quote_seats(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
    Json(req): Json<QuoteRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let map = seat_map(&state, room_id)?;

    let total_price = map.quote(&req.seats).map_err(selection_error)?;

    Ok(Json(QuoteResponse {
        room_id,
        seats: req.seats,
        total_price,
    }))
}
