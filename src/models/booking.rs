use crate::models::selection::SeatPick;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A persisted booking row. Seats are stored as a JSON array of seat picks.
#[allow(dead_code)]
#[derive(Debug, sqlx::FromRow)]
pub struct BookingRow {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub movie_id: String,
    pub movie_title: String,
    pub show_date: NaiveDate,
    pub showtime: String,
    pub seats: String,
    pub total_paid: Decimal,
    pub payment_id: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

/// Checkout request: the payment id handed back by the gateway widget plus
/// the contact details collected before payment.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ConfirmBookingRequest {
    #[validate(length(min = 1, message = "payment id is required"))]
    pub payment_id: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingDetail {
    pub booking_id: i32,
    pub movie_id: String,
    pub movie_title: String,
    pub show_date: NaiveDate,
    pub showtime: String,
    pub seats: Vec<SeatPick>,
    #[schemars(with = "String")]
    pub total_paid: Decimal,
    pub payment_id: String,
    pub expires_at: NaiveDateTime,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ConfirmBookingResponse {
    pub booking: BookingDetail,
    pub booking_status: String,
}

/// The caller's booking history, split the way the original listing page
/// showed it.
#[derive(Debug, Serialize, JsonSchema)]
pub struct MyBookingsResponse {
    pub active: Vec<BookingDetail>,
    pub expired: Vec<BookingDetail>,
}
