use chrono::{SecondsFormat, Utc};
use rand::Rng;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::{Booking, BookingStatus, NewBooking};
use crate::store::{Store, StoreError};

pub const BOOKINGS_KEY: &str = "cinema_bookings";
const QR_CODE_PREFIX: &str = "PTIT_CINEMA_";
const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ID_SUFFIX_LEN: usize = 9;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("booking {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Clone)]
pub struct BookingService {
    store: Store,
    // чтение-изменение-запись списка броней идет строго по одному
    write_lock: Arc<Mutex<()>>,
}

impl BookingService {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn create_booking(&self, new: NewBooking) -> Result<Booking, BookingError> {
        let id = generate_booking_id();
        let booking = Booking {
            qr_code: Some(generate_qr_code(&id)),
            id,
            user_id: new.user_id,
            movie_id: new.movie_id,
            showtime_id: new.showtime_id,
            cinema_name: new.cinema_name,
            movie_title: new.movie_title,
            date: new.date,
            time: new.time,
            seats: new.seats,
            total_price: new.total_price,
            status: BookingStatus::Confirmed,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let _guard = self.write_lock.lock().await;
        let mut bookings = self.get_all_bookings().await?;
        bookings.push(booking.clone());
        self.store.set_list(BOOKINGS_KEY, &bookings).await?;

        info!(
            "Created booking {} for showtime {} ({} seats)",
            booking.id,
            booking.showtime_id,
            booking.seats.len()
        );
        Ok(booking)
    }

    pub async fn get_booking_by_id(&self, id: &str) -> Result<Option<Booking>, BookingError> {
        Ok(self
            .get_all_bookings()
            .await?
            .into_iter()
            .find(|b| b.id == id))
    }

    pub async fn get_all_bookings(&self) -> Result<Vec<Booking>, BookingError> {
        Ok(self.store.get_list(BOOKINGS_KEY).await?)
    }

    pub async fn get_user_bookings(&self, user_id: i64) -> Result<Vec<Booking>, BookingError> {
        Ok(self
            .get_all_bookings()
            .await?
            .into_iter()
            .filter(|b| b.user_id == Some(user_id))
            .collect())
    }

    /// Отменяет бронь. Повторная отмена ничего не меняет.
    pub async fn cancel_booking(&self, id: &str) -> Result<Booking, BookingError> {
        let _guard = self.write_lock.lock().await;
        let mut bookings = self.get_all_bookings().await?;
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        if booking.status == BookingStatus::Cancelled {
            return Ok(booking.clone());
        }
        booking.status = BookingStatus::Cancelled;
        let cancelled = booking.clone();
        self.store.set_list(BOOKINGS_KEY, &bookings).await?;

        info!("Cancelled booking {}", id);
        Ok(cancelled)
    }
}

pub fn generate_qr_code(booking_id: &str) -> String {
    format!("{}{}", QR_CODE_PREFIX, booking_id)
}

// BK + unix millis + 9 случайных символов base36
fn generate_booking_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("BK{}{}", Utc::now().timestamp_millis(), suffix)
}
