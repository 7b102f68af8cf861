pub mod user;
pub mod seat;
pub mod booking;

pub use user::{AuthResponse, LoginRequest, RegisterRequest, StoredUser, User};
pub use seat::{Seat, SeatMap, SeatSelectionError, SeatStatus, SeatType};
pub use booking::{Booking, BookingStatus, NewBooking};
