pub mod booking;
pub mod movie;
pub mod payment;
pub mod seat;
pub mod selection;
pub mod user;
