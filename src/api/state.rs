//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, PhotoStore};
use crate::services::{
    AppointmentService, AuthService, DoctorService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub doctor_service: Arc<dyn DoctorService>,
    pub appointment_service: Arc<dyn AppointmentService>,
    pub user_service: Arc<dyn UserService>,
    /// Database connection (health checks)
    pub database: Arc<Database>,
    /// Doctor photo storage
    pub photos: Arc<PhotoStore>,
    /// Largest accepted request body for uploads
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create application state from database connection and config.
    ///
    /// # Errors
    /// `Internal` if the uploads directory cannot be opened.
    pub fn from_config(database: Arc<Database>, config: Config) -> AppResult<Self> {
        let photos = Arc::new(PhotoStore::new(&config.uploads_dir)?);
        let max_upload_bytes = config.max_upload_bytes;
        let container = Services::from_connection(database.get_connection(), config);

        Ok(Self::new(&container, database, photos, max_upload_bytes))
    }

    /// Create application state from an already built service container.
    pub fn new(
        services: &dyn ServiceContainer,
        database: Arc<Database>,
        photos: Arc<PhotoStore>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            doctor_service: services.doctors(),
            appointment_service: services.appointments(),
            user_service: services.users(),
            database,
            photos,
            max_upload_bytes,
        }
    }
}
