//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories over one shared connection pool.
//! Cross-row consistency comes from the store itself (unique indexes and
//! conditional updates), so no explicit transactions are opened here.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    AppointmentRepository, AppointmentStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get appointment repository
    fn appointments(&self) -> Arc<dyn AppointmentRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<dyn UserRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
}

impl Persistence {
    /// Create new UnitOfWork instance backed by `db`
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            appointment_repo: Arc::new(AppointmentStore::new(db)),
        }
    }

    /// Assemble a UnitOfWork from existing repositories (mocks in tests)
    pub fn with_repositories(
        user_repo: Arc<dyn UserRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self {
            user_repo,
            appointment_repo,
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.appointment_repo.clone()
    }
}
