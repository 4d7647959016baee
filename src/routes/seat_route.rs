use crate::models::seat::SeatMapResponse;
use crate::services::booking_service::BookingService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::showtime::{self, ShowtimesResponse};
use rocket::serde::json::Json;
use rocket::{get, State};
use rocket_okapi::openapi;

/// The fixed daily showtime slots
#[openapi(tag = "Shows")]
#[get("/showtimes")]
pub async fn showtimes() -> Json<ShowtimesResponse> {
    Json(showtime::list_slots())
}

/// Seat map for one show, projected against active bookings. Clients poll
/// this to pick up seats taken by other bookers.
#[openapi(tag = "Shows")]
#[get("/seats?<movie_id>&<date>&<showtime>")]
pub async fn seat_view(
    movie_id: String,
    date: String,
    showtime: String,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<SeatMapResponse>, AppError> {
    let show_date = showtime::parse_show_date(&date)?;
    let view = booking_service
        .seat_view(auth.user_id, &movie_id, show_date, &showtime)
        .await?;
    Ok(Json(view))
}
