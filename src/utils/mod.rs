pub mod config;
pub mod error;
pub mod jwt;
pub mod showtime;
