//! seat_map.rs
//!
//! Генерация схемы зала и реестр схем для известных залов.
//!
//! - Тип и цена места зависят только от его позиции (ряд, номер).
//! - Случайна только занятость: ровно 30% мест (с округлением вниз) помечаются
//!   как `OCCUPIED`, выбор делается без повторов через переданный генератор.

use rand::Rng;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::models::{Seat, SeatMap, SeatStatus, SeatType};

/// Фиксированный алфавит рядов; больше 10 рядов не поддерживается.
pub const ROW_LABELS: [char; 10] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];
pub const MAX_ROWS: u32 = ROW_LABELS.len() as u32;

pub const DEFAULT_ROWS: u32 = 8;
pub const DEFAULT_SEATS_PER_ROW: u32 = 12;

/// Средние ряды (D, E, F) по индексу, независимо от размера зала.
const VIP_ROWS: std::ops::RangeInclusive<u32> = 3..=5;

/// Доля занятых мест: 3/10.
const OCCUPIED_NUMERATOR: u32 = 3;
const OCCUPIED_DENOMINATOR: u32 = 10;

/// Залы, схемы которых создаются при старте: (room_id, rows, seats_per_row).
pub const KNOWN_ROOMS: [(i64, u32, u32); 3] = [(1, 8, 12), (2, 10, 14), (3, 8, 10)];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatMapError {
    #[error("invalid seat map dimensions {rows}x{seats_per_row}: rows must be in 1..={max_rows}, seats per row at least 1")]
    InvalidDimension {
        rows: u32,
        seats_per_row: u32,
        max_rows: u32,
    },
}

pub fn occupied_count(rows: u32, seats_per_row: u32) -> usize {
    (rows as usize * seats_per_row as usize * OCCUPIED_NUMERATOR as usize)
        / OCCUPIED_DENOMINATOR as usize
}

/// Тип места по позиции. `row_index` с нуля, `number` с единицы.
pub fn seat_type_at(row_index: u32, number: u32, seats_per_row: u32) -> SeatType {
    if VIP_ROWS.contains(&row_index) {
        // последние два места VIP-ряда - парные
        if number + 1 >= seats_per_row {
            SeatType::Couple
        } else {
            SeatType::Vip
        }
    } else {
        SeatType::Standard
    }
}

/// Строит схему зала `rows` x `seats_per_row`.
///
/// Занятые места выбираются через `rng`, поэтому с засеянным генератором
/// результат воспроизводим.
pub fn generate<R: Rng + ?Sized>(
    room_id: i64,
    rows: u32,
    seats_per_row: u32,
    rng: &mut R,
) -> Result<SeatMap, SeatMapError> {
    if rows == 0 || rows > MAX_ROWS || seats_per_row == 0 {
        return Err(SeatMapError::InvalidDimension {
            rows,
            seats_per_row,
            max_rows: MAX_ROWS,
        });
    }

    let total = rows as usize * seats_per_row as usize;
    let occupied: HashSet<usize> =
        rand::seq::index::sample(rng, total, occupied_count(rows, seats_per_row))
            .into_iter()
            .collect();

    let mut seats = Vec::with_capacity(total);
    for (r, &label) in ROW_LABELS.iter().enumerate().take(rows as usize) {
        for number in 1..=seats_per_row {
            let seat_type = seat_type_at(r as u32, number, seats_per_row);
            let position = seats.len();
            seats.push(Seat {
                id: format!("{}{}", label, number),
                row: label,
                number,
                seat_type,
                status: if occupied.contains(&position) {
                    SeatStatus::Occupied
                } else {
                    SeatStatus::Available
                },
                price: seat_type.price(),
            });
        }
    }

    debug!(
        "Generated seat map for room {}: {} seats, {} occupied",
        room_id,
        seats.len(),
        occupied.len()
    );

    Ok(SeatMap {
        room_id,
        rows,
        seats_per_row,
        seats,
    })
}

/// Схема с размерами по умолчанию (8 x 12).
pub fn generate_default<R: Rng + ?Sized>(room_id: i64, rng: &mut R) -> Result<SeatMap, SeatMapError> {
    generate(room_id, DEFAULT_ROWS, DEFAULT_SEATS_PER_ROW, rng)
}

/// Схемы залов, созданные один раз при старте и дальше только читаемые.
#[derive(Debug, Clone, Default)]
pub struct SeatMapRegistry {
    maps: HashMap<i64, SeatMap>,
}

impl SeatMapRegistry {
    pub fn with_known_rooms<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, SeatMapError> {
        let mut maps = HashMap::with_capacity(KNOWN_ROOMS.len());
        for (room_id, rows, seats_per_row) in KNOWN_ROOMS {
            maps.insert(room_id, generate(room_id, rows, seats_per_row, rng)?);
        }
        info!("Seat map registry ready with {} rooms", maps.len());
        Ok(Self { maps })
    }

    pub fn get_by_room_id(&self, room_id: i64) -> Option<&SeatMap> {
        self.maps.get(&room_id)
    }

    pub fn room_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.maps.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
