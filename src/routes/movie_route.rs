use crate::models::movie::{MovieDetail, MoviePage};
use crate::services::catalog_service::CatalogService;
use crate::utils::error::AppError;
use rocket::serde::json::Json;
use rocket::{get, State};
use rocket_okapi::openapi;

/// Search the movie catalog by keyword
#[openapi(tag = "Movies")]
#[get("/movies/search?<query>&<page>")]
pub async fn search_movies(
    query: String,
    page: Option<u32>,
    catalog: &State<CatalogService>,
) -> Result<Json<MoviePage>, AppError> {
    let page = catalog.search_movies(&query, page.unwrap_or(1)).await?;
    Ok(Json(page))
}

/// Fetch one movie's details
#[openapi(tag = "Movies")]
#[get("/movies/<id>")]
pub async fn movie_details(
    id: i64,
    catalog: &State<CatalogService>,
) -> Result<Json<MovieDetail>, AppError> {
    let detail = catalog.movie_details(id).await?;
    Ok(Json(detail))
}

/// List a catalog category (popular, now_playing, upcoming, top_rated)
#[openapi(tag = "Movies")]
#[get("/movies/<category>?<page>", rank = 2)]
pub async fn movies_by_category(
    category: String,
    page: Option<u32>,
    catalog: &State<CatalogService>,
) -> Result<Json<MoviePage>, AppError> {
    let listing = catalog
        .movies_by_category(&category, page.unwrap_or(1))
        .await?;
    Ok(Json(listing))
}
