pub mod booking_route;
pub mod movie_route;
pub mod payment_route;
pub mod seat_route;
pub mod selection_route;
pub mod user_route;
