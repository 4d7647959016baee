use crate::models::booking::{ConfirmBookingRequest, ConfirmBookingResponse, MyBookingsResponse};
use crate::services::booking_service::BookingService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::serde::json::Json;
use rocket::{get, post, State};
use rocket_okapi::openapi;

/// Confirm a booking after payment success
#[openapi(tag = "Bookings")]
#[post("/bookings", format = "json", data = "<request>")]
pub async fn confirm_booking(
    request: Json<ConfirmBookingRequest>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<ConfirmBookingResponse>, AppError> {
    let response = booking_service
        .confirm_booking(auth.user_id, request.into_inner())
        .await?;
    Ok(Json(response))
}

/// The caller's bookings, active and expired
#[openapi(tag = "Bookings")]
#[get("/bookings")]
pub async fn my_bookings(
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<MyBookingsResponse>, AppError> {
    let response = booking_service.my_bookings(auth.user_id).await?;
    Ok(Json(response))
}
