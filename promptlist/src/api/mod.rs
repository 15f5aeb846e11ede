//! HTTP API handlers for promptlist

pub mod generate;
pub mod health;

pub use generate::generate_routes;
pub use health::health_routes;
