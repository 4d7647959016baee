use crate::models::seat::Seat;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One picked seat, carried with the tier price it was picked at.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SeatPick {
    pub id: String,
    #[schemars(with = "String")]
    pub price: Decimal,
}

/// The caller's in-progress booking: movie, show, and seat picks. Ephemeral
/// session state, persisted only through the selection store's explicit
/// load/save.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Selection {
    pub movie_id: Option<String>,
    pub movie_title: Option<String>,
    pub show_date: Option<NaiveDate>,
    pub showtime: Option<String>,
    pub seats: Vec<SeatPick>,
}

impl Selection {
    /// Point the selection at a show. Switching to a different movie, date
    /// or showtime drops the seat picks, since they belong to the old show.
    pub fn set_show(
        &mut self,
        movie_id: String,
        movie_title: String,
        show_date: NaiveDate,
        showtime: String,
    ) {
        let same_show = self.movie_id.as_deref() == Some(movie_id.as_str())
            && self.show_date == Some(show_date)
            && self.showtime.as_deref() == Some(showtime.as_str());
        if !same_show {
            self.seats.clear();
        }
        self.movie_id = Some(movie_id);
        self.movie_title = Some(movie_title);
        self.show_date = Some(show_date);
        self.showtime = Some(showtime);
    }

    /// Toggle a seat pick. Returns true when the seat is selected afterwards.
    pub fn toggle(&mut self, seat: &Seat) -> bool {
        if let Some(pos) = self.seats.iter().position(|p| p.id == seat.id) {
            self.seats.remove(pos);
            false
        } else {
            self.seats.push(SeatPick {
                id: seat.id.clone(),
                price: seat.price,
            });
            true
        }
    }

    pub fn seat_ids(&self) -> HashSet<String> {
        self.seats.iter().map(|p| p.id.clone()).collect()
    }

    pub fn total(&self) -> Decimal {
        self.seats.iter().map(|p| p.price).sum()
    }

    /// Ready for checkout: a show is chosen and at least one seat is picked.
    pub fn is_complete(&self) -> bool {
        self.movie_id.is_some()
            && self.show_date.is_some()
            && self.showtime.is_some()
            && !self.seats.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Selection::default();
    }
}
