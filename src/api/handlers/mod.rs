//! HTTP request handlers, one module per route group.

pub mod admin_handler;
pub mod auth_handler;
pub mod doctor_handler;
pub mod patient_handler;

pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use doctor_handler::doctor_routes;
pub use patient_handler::patient_routes;
