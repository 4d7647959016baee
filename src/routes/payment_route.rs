use crate::models::payment::{CreateOrderRequest, PaymentOrder};
use crate::services::payment_service::PaymentService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::serde::json::Json;
use rocket::{post, State};
use rocket_okapi::openapi;

/// Create a payment order at the gateway. Pure relay: amount in, order out.
#[openapi(tag = "Payments")]
#[post("/orders", format = "json", data = "<request>")]
pub async fn create_order(
    request: Json<CreateOrderRequest>,
    _auth: AuthenticatedUser,
    payment_service: &State<PaymentService>,
) -> Result<Json<PaymentOrder>, AppError> {
    let order = payment_service.create_order(request.amount).await?;
    Ok(Json(order))
}
