//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Unit of Work for repository access
//! - Photo storage on local disk

pub mod db;
pub mod repositories;
pub mod unit_of_work;
pub mod uploads;

pub use db::{Database, MigrationState, Migrator};
pub use repositories::{AppointmentRepository, AppointmentStore, UserRepository, UserStore};
pub use unit_of_work::{Persistence, UnitOfWork};
pub use uploads::{PhotoStore, UploadedPhoto};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockAppointmentRepository, MockUserRepository};
