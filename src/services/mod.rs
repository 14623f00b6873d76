//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and reach repositories through the Unit of Work.

mod appointment_service;
mod auth_service;
pub mod container;
mod doctor_service;
mod user_service;

// Service Container
pub use container::{parallel, ServiceContainer, Services};

// Service traits and implementations
pub use appointment_service::{AppointmentManager, AppointmentService};
pub use auth_service::{normalize_email, AuthService, Authenticator, Claims, TokenResponse};
pub use doctor_service::{DoctorManager, DoctorService};
pub use user_service::{UserManager, UserService};
