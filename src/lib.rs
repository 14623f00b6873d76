//! Hospital booking core
//!
//! Patients book slots with doctors, doctors resolve their appointments and
//! move through a leave lifecycle, admins onboard doctors and review their
//! requests.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Roles, lifecycle state machine, appointments
//! - **services**: Booking, lifecycle and account use cases
//! - **infra**: Database, repositories, migrations and photo storage
//! - **api**: HTTP handlers, role gate and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create the first admin
//! cargo run -- admin create --name Root --email root@hospital.example --password changeme123
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{AppointmentStatus, DoctorStatus, Password, User, UserRole};
pub use errors::{AppError, AppResult};
