use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub movie_id: i64,
    pub showtime_id: i64,
    pub cinema_name: String,
    pub movie_title: String,
    pub date: String,
    pub time: String,
    pub seats: Vec<String>,
    pub total_price: u64,
    pub status: BookingStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

// Данные для создания брони: id, createdAt и qrCode назначает сервис
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    #[serde(default)]
    pub user_id: Option<i64>,
    pub movie_id: i64,
    pub showtime_id: i64,
    pub cinema_name: String,
    pub movie_title: String,
    pub date: String,
    pub time: String,
    pub seats: Vec<String>,
    pub total_price: u64,
}
