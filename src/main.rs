use dotenv::dotenv;
use movie_booking_system::db::Database;
use movie_booking_system::routes;
use movie_booking_system::services::booking_service::BookingService;
use movie_booking_system::services::catalog_service::CatalogService;
use movie_booking_system::services::payment_service::PaymentService;
use movie_booking_system::services::selection_service::SelectionService;
use movie_booking_system::services::user_service::UserService;
use movie_booking_system::swagger::swagger_ui;
use movie_booking_system::utils::config::AppConfig;
use rocket::fairing::AdHoc;
use rocket::launch;
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::make_swagger_ui;
use std::time::Duration;

// The original client swept expired seat holds every ten minutes
const SWEEP_PERIOD: Duration = Duration::from_secs(10 * 60);

#[launch]
async fn rocket() -> _ {
    dotenv().ok();

    let config = AppConfig::from_env().expect("incomplete environment");

    let db = Database::new(&config.database_url)
        .await
        .expect("Failed to connect to database");
    let pool = db.get_pool().clone();

    let user_service = UserService::new(pool.clone());
    let selection_service = SelectionService::new(pool.clone());
    let booking_service = BookingService::new(pool.clone());
    let catalog_service = CatalogService::new(&config.catalog);
    let payment_service = PaymentService::new(&config.payment);

    let sweep_pool = pool.clone();

    rocket::build()
        .manage(user_service)
        .manage(selection_service)
        .manage(booking_service)
        .manage(catalog_service)
        .manage(payment_service)
        .mount(
            "/api",
            openapi_get_routes![
                routes::user_route::register,
                routes::user_route::login,
                routes::movie_route::search_movies,
                routes::movie_route::movie_details,
                routes::movie_route::movies_by_category,
                routes::seat_route::showtimes,
                routes::seat_route::seat_view,
                routes::selection_route::get_selection,
                routes::selection_route::set_show,
                routes::selection_route::toggle_seat,
                routes::selection_route::clear_selection,
                routes::payment_route::create_order,
                routes::booking_route::confirm_booking,
                routes::booking_route::my_bookings,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
        .attach(AdHoc::on_liftoff("Expired seat sweeper", move |_| {
            Box::pin(async move {
                let sweeper = BookingService::new(sweep_pool);
                tokio::spawn(async move {
                    let mut interval = tokio::time::interval(SWEEP_PERIOD);
                    loop {
                        interval.tick().await;
                        let now = chrono::Utc::now().naive_utc();
                        match sweeper.sweep_expired(now).await {
                            Ok(0) => {}
                            Ok(n) => log::info!("released {} expired seat holds", n),
                            Err(e) => log::warn!("seat sweep failed: {}", e),
                        }
                    }
                });
            })
        }))
}
