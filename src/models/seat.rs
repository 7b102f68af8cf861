use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatType {
    Standard,
    Vip,
    Couple,
}

impl SeatType {
    /// Цена места определяется только его типом.
    pub fn price(self) -> u64 {
        match self {
            SeatType::Standard => 100_000,
            SeatType::Vip => 150_000,
            SeatType::Couple => 200_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Occupied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    pub row: char,
    pub number: u32,
    #[serde(rename = "type")]
    pub seat_type: SeatType,
    pub status: SeatStatus,
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    pub room_id: i64,
    pub rows: u32,
    pub seats_per_row: u32,
    pub seats: Vec<Seat>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatSelectionError {
    #[error("no seats selected")]
    EmptySelection,
    #[error("seat {0} does not exist in this room")]
    UnknownSeat(String),
    #[error("seat {0} is already occupied")]
    SeatOccupied(String),
    #[error("seat {0} selected more than once")]
    DuplicateSeat(String),
}

impl SeatMap {
    pub fn seat(&self, seat_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == seat_id)
    }

    pub fn occupied_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| s.status == SeatStatus::Occupied)
            .count()
    }

    /// Считает итоговую стоимость выбранных мест.
    ///
    /// Выбор должен быть непустым, без повторов и только из свободных мест этого зала.
    pub fn quote<S: AsRef<str>>(&self, seat_ids: &[S]) -> Result<u64, SeatSelectionError> {
        if seat_ids.is_empty() {
            return Err(SeatSelectionError::EmptySelection);
        }

        let mut seen = std::collections::HashSet::with_capacity(seat_ids.len());
        let mut total = 0u64;
        for id in seat_ids {
            let id = id.as_ref();
            if !seen.insert(id) {
                return Err(SeatSelectionError::DuplicateSeat(id.to_string()));
            }
            let seat = self
                .seat(id)
                .ok_or_else(|| SeatSelectionError::UnknownSeat(id.to_string()))?;
            if seat.status == SeatStatus::Occupied {
                return Err(SeatSelectionError::SeatOccupied(id.to_string()));
            }
            total += seat.price;
        }
        Ok(total)
    }
}
