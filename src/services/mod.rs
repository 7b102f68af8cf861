pub mod seat_map;
pub mod auth;
pub mod booking;
