use crate::utils::error::{AppError, AppResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use schemars::JsonSchema;
use serde::Serialize;

/// Bookings stay "active" (and their seats stay locked) until this long
/// after the show starts.
pub const HOLD_AFTER_START_HOURS: i64 = 6;

pub struct ShowtimeSlot {
    pub label: &'static str,
    pub times: &'static [&'static str],
}

/// The fixed daily schedule every movie runs on.
pub const SHOWTIME_SLOTS: &[ShowtimeSlot] = &[
    ShowtimeSlot {
        label: "Morning Shows",
        times: &["9:00 AM", "10:30 AM", "11:30 AM"],
    },
    ShowtimeSlot {
        label: "Matinee Shows",
        times: &["12:30 PM", "2:00 PM", "3:30 PM"],
    },
    ShowtimeSlot {
        label: "Evening Shows",
        times: &["5:00 PM", "6:30 PM", "8:00 PM"],
    },
    ShowtimeSlot {
        label: "Night Shows",
        times: &["9:30 PM", "10:30 PM"],
    },
];

#[derive(Debug, Serialize, JsonSchema)]
pub struct ShowtimeGroup {
    pub label: String,
    pub times: Vec<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ShowtimesResponse {
    pub slots: Vec<ShowtimeGroup>,
}

pub fn list_slots() -> ShowtimesResponse {
    ShowtimesResponse {
        slots: SHOWTIME_SLOTS
            .iter()
            .map(|slot| ShowtimeGroup {
                label: slot.label.to_string(),
                times: slot.times.iter().map(|t| t.to_string()).collect(),
            })
            .collect(),
    }
}

pub fn is_listed(showtime: &str) -> bool {
    SHOWTIME_SLOTS
        .iter()
        .any(|slot| slot.times.contains(&showtime))
}

/// Combine a show date with a scheduled 12-hour clock time.
pub fn show_start(date: NaiveDate, showtime: &str) -> AppResult<NaiveDateTime> {
    if !is_listed(showtime) {
        return Err(AppError::BadRequest(format!(
            "Unknown showtime: {}",
            showtime
        )));
    }
    let time = NaiveTime::parse_from_str(showtime, "%I:%M %p")
        .map_err(|_| AppError::BadRequest(format!("Invalid showtime format: {}", showtime)))?;
    Ok(date.and_time(time))
}

pub fn expires_at(start: NaiveDateTime) -> NaiveDateTime {
    start + Duration::hours(HOLD_AFTER_START_HOURS)
}

pub fn parse_show_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date format, expected YYYY-MM-DD".into()))
}
