use crate::models::selection::Selection;
use crate::services::selection_service::SelectionService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::showtime;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put, State};
use rocket_okapi::openapi;
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetShowRequest {
    pub movie_id: String,
    pub movie_title: String,
    /// YYYY-MM-DD
    pub show_date: String,
    pub showtime: String,
}

/// The caller's current selection
#[openapi(tag = "Selection")]
#[get("/selection")]
pub async fn get_selection(
    auth: AuthenticatedUser,
    selection_service: &State<SelectionService>,
) -> Result<Json<Selection>, AppError> {
    let selection = selection_service.load(auth.user_id).await?;
    Ok(Json(selection))
}

/// Choose the movie, date and showtime. Changing the show clears seat picks.
#[openapi(tag = "Selection")]
#[put("/selection/show", format = "json", data = "<request>")]
pub async fn set_show(
    request: Json<SetShowRequest>,
    auth: AuthenticatedUser,
    selection_service: &State<SelectionService>,
) -> Result<Json<Selection>, AppError> {
    let request = request.into_inner();
    let show_date = showtime::parse_show_date(&request.show_date)?;
    let selection = selection_service
        .set_show(
            auth.user_id,
            request.movie_id,
            request.movie_title,
            show_date,
            request.showtime,
        )
        .await?;
    Ok(Json(selection))
}

/// Toggle one seat in the selection
#[openapi(tag = "Selection")]
#[post("/selection/seats/<seat_id>")]
pub async fn toggle_seat(
    seat_id: String,
    auth: AuthenticatedUser,
    selection_service: &State<SelectionService>,
) -> Result<Json<Selection>, AppError> {
    let selection = selection_service.toggle_seat(auth.user_id, &seat_id).await?;
    Ok(Json(selection))
}

/// Drop the whole selection
#[openapi(tag = "Selection")]
#[delete("/selection")]
pub async fn clear_selection(
    auth: AuthenticatedUser,
    selection_service: &State<SelectionService>,
) -> Result<Json<Selection>, AppError> {
    selection_service.clear(auth.user_id).await?;
    Ok(Json(Selection::default()))
}
