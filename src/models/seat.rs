use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::Display;

pub const SEAT_ROWS: &[char] = &['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
pub const SEATS_PER_ROW: u32 = 8;

// Seat status is derived locally from booking records, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Selected,
    Locked,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Seat {
    pub id: String,
    pub row: char,
    pub number: u32,
    #[schemars(with = "String")]
    pub price: Decimal,
    pub status: SeatStatus,
}

/// Price tier by row letter: the front block (A-C) is the cheap class.
pub fn row_price(row: char) -> Decimal {
    match row {
        'A' | 'B' | 'C' => Decimal::from(1),
        _ => Decimal::from(2),
    }
}

/// Generate the fixed auditorium layout. Deterministic: every call yields
/// the same seats with the same prices, all available.
pub fn build_seat_map() -> Vec<Seat> {
    let mut seats = Vec::with_capacity(SEAT_ROWS.len() * SEATS_PER_ROW as usize);
    for &row in SEAT_ROWS {
        for number in 1..=SEATS_PER_ROW {
            seats.push(Seat {
                id: format!("{}{}", row, number),
                row,
                number,
                price: row_price(row),
                status: SeatStatus::Available,
            });
        }
    }
    seats
}

/// Re-derive every seat's status from the locked set (active bookings for
/// this show) and the caller's current picks. Locked always wins; the
/// projection is idempotent, so it can run on every poll.
pub fn project_occupancy(seats: &mut [Seat], locked: &HashSet<String>, selected: &HashSet<String>) {
    for seat in seats.iter_mut() {
        seat.status = if locked.contains(&seat.id) {
            SeatStatus::Locked
        } else if selected.contains(&seat.id) {
            SeatStatus::Selected
        } else {
            SeatStatus::Available
        };
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SeatMapResponse {
    pub seats: Vec<Seat>,
}
