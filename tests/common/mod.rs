//! Shared fixtures: an in-memory SQLite store behind the real services.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use hospital_booking::api::{create_router, AppState};
use hospital_booking::config::Config;
use hospital_booking::domain::{DoctorProfile, DoctorResponse, User, UserRole};
use hospital_booking::infra::{Database, PhotoStore};
use hospital_booking::services::{ServiceContainer, Services};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub services: Services,
    pub state: AppState,
    pub uploads: PathBuf,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::new("sqlite::memory:", TEST_SECRET).expect("test config");
        let database = Database::connect(&config).await.expect("sqlite store");
        let uploads = std::env::temp_dir().join(format!("hospital-booking-{}", Uuid::new_v4()));

        let services = Services::from_connection(database.get_connection(), config.clone());
        let state = AppState::new(
            &services,
            Arc::new(database),
            Arc::new(PhotoStore::new(&uploads).expect("photo store")),
            config.max_upload_bytes,
        );

        Self {
            services,
            state,
            uploads,
        }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    pub async fn patient(&self, name: &str) -> User {
        self.services
            .auth()
            .register(name.into(), format!("{}@example.com", name.to_lowercase()), PASSWORD.into())
            .await
            .expect("register patient")
    }

    pub async fn admin(&self) -> User {
        self.services
            .auth()
            .create_admin("Root".into(), "root@hospital.example".into(), PASSWORD.into())
            .await
            .expect("create admin")
    }

    pub async fn doctor(&self, name: &str) -> DoctorResponse {
        let profile = DoctorProfile {
            name: name.into(),
            email: format!("{}@hospital.example", name.to_lowercase().replace(' ', ".")),
            specialization: "Cardiology".into(),
            age: Some(45),
            phone: Some("5551234567".into()),
            photo: None,
        };
        self.services
            .doctors()
            .onboard(profile, PASSWORD.into())
            .await
            .expect("onboard doctor")
    }

    pub fn token(&self, id: Uuid, role: UserRole, name: &str) -> String {
        self.services
            .auth()
            .issue_token(id, role, name)
            .expect("issue token")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.uploads);
    }
}
