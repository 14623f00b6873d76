//! Service Container - Centralized service access with parallel execution support.
//!
//! SOLID (DIP): Handlers depend on service traits, not implementations.

use std::future::Future;
use std::sync::Arc;

use super::{
    AppointmentManager, AppointmentService, AuthService, Authenticator, DoctorManager,
    DoctorService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn doctors(&self) -> Arc<dyn DoctorService>;

    fn appointments(&self) -> Arc<dyn AppointmentService>;

    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    doctor_service: Arc<dyn DoctorService>,
    appointment_service: Arc<dyn AppointmentService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            doctor_service: Arc::new(DoctorManager::new(uow.clone())),
            appointment_service: Arc::new(AppointmentManager::new(uow.clone())),
            user_service: Arc::new(UserManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn doctors(&self) -> Arc<dyn DoctorService> {
        self.doctor_service.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentService> {
        self.appointment_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let (doctors, counts) = parallel::join2(
    ///     users.list_by_role(UserRole::Doctor),
    ///     appointments.completed_counts(),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }
}
