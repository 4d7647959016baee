pub mod booking_service;
pub mod catalog_service;
pub mod payment_service;
pub mod selection_service;
pub mod user_service;
