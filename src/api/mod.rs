pub mod booking_client;
pub mod handlers;
pub mod models;
pub mod routes;

pub use booking_client::{BookingApi, BookingClient};
