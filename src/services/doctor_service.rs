//! Doctor service - Onboarding, directory reads and the availability
//! lifecycle.
//!
//! Every stored status change is a compare-and-set against the status the
//! transition was computed from; losing a race surfaces as
//! `InvalidTransition`.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::auth_service::{normalize_email, required_text};
use super::container::parallel;
use crate::domain::{
    DoctorProfile, DoctorResponse, DoctorStatus, LifecycleEvent, NewUser, Password, User,
    UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Doctor service trait for dependency injection.
#[async_trait]
pub trait DoctorService: Send + Sync {
    /// Create a doctor account in status `active`
    async fn onboard(&self, profile: DoctorProfile, password: String) -> AppResult<DoctorResponse>;

    /// All doctors with their completed appointment counts
    async fn list_doctors(&self) -> AppResult<Vec<DoctorResponse>>;

    /// A single doctor with their completed appointment count
    async fn get_doctor(&self, id: Uuid) -> AppResult<DoctorResponse>;

    /// Delete a doctor account; returns the removed doctor
    async fn remove(&self, id: Uuid) -> AppResult<User>;

    /// Doctor asks to go on leave
    async fn request_leave(&self, doctor_id: Uuid) -> AppResult<DoctorStatus>;

    /// Doctor on leave asks to return to work
    async fn request_return(&self, doctor_id: Uuid) -> AppResult<DoctorStatus>;

    /// Admin decision on a pending request, expressed as the target status
    async fn review_status(&self, doctor_id: Uuid, target: DoctorStatus)
        -> AppResult<DoctorStatus>;
}

/// Concrete implementation of DoctorService using Unit of Work.
pub struct DoctorManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DoctorManager<U> {
    /// Create new doctor service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_doctor(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .filter(User::is_doctor)
            .ok_or_not_found("Doctor")
    }

    async fn apply(
        &self,
        doctor_id: Uuid,
        from: DoctorStatus,
        event: LifecycleEvent,
    ) -> AppResult<DoctorStatus> {
        let to = from.transition(event)?;

        let applied = self
            .uow
            .users()
            .transition_status(doctor_id, from, to)
            .await?;

        if !applied {
            tracing::warn!(%doctor_id, %event, "Doctor status changed concurrently");
            return Err(AppError::invalid_transition(from, event));
        }

        tracing::info!(%doctor_id, %event, from = %from, to = %to, "Doctor status changed");
        Ok(to)
    }

    async fn raise(&self, doctor_id: Uuid, event: LifecycleEvent) -> AppResult<DoctorStatus> {
        let doctor = self.find_doctor(doctor_id).await?;
        self.apply(doctor_id, doctor.status, event).await
    }
}

#[async_trait]
impl<U: UnitOfWork> DoctorService for DoctorManager<U> {
    async fn onboard(&self, profile: DoctorProfile, password: String) -> AppResult<DoctorResponse> {
        let profile = DoctorProfile {
            email: normalize_email(&profile.email),
            name: required_text("Name", &profile.name)?,
            specialization: required_text("Specialization", &profile.specialization)?,
            ..profile
        };

        if self.uow.users().find_by_email(&profile.email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = Password::new(&password)?.into_string();
        let doctor = self
            .uow
            .users()
            .create(NewUser::doctor(profile, password_hash))
            .await?;

        tracing::info!(doctor_id = %doctor.id, "Doctor onboarded");
        Ok(DoctorResponse::new(doctor, 0))
    }

    async fn list_doctors(&self) -> AppResult<Vec<DoctorResponse>> {
        let users = self.uow.users();
        let appointments = self.uow.appointments();

        let (doctors, counts) = parallel::join2(
            users.list_by_role(UserRole::Doctor),
            appointments.completed_counts(),
        )
        .await?;

        Ok(doctors
            .into_iter()
            .map(|doctor| {
                let count = counts.get(&doctor.id).copied().unwrap_or(0);
                DoctorResponse::new(doctor, count)
            })
            .collect())
    }

    async fn get_doctor(&self, id: Uuid) -> AppResult<DoctorResponse> {
        let appointments = self.uow.appointments();

        let (doctor, count) =
            parallel::join2(self.find_doctor(id), appointments.count_completed(id)).await?;

        Ok(DoctorResponse::new(doctor, count))
    }

    async fn remove(&self, id: Uuid) -> AppResult<User> {
        let doctor = self.find_doctor(id).await?;
        self.uow.users().delete_doctor(id).await?;

        tracing::info!(doctor_id = %id, "Doctor removed");
        Ok(doctor)
    }

    async fn request_leave(&self, doctor_id: Uuid) -> AppResult<DoctorStatus> {
        self.raise(doctor_id, LifecycleEvent::RequestLeave).await
    }

    async fn request_return(&self, doctor_id: Uuid) -> AppResult<DoctorStatus> {
        self.raise(doctor_id, LifecycleEvent::RequestReturn).await
    }

    async fn review_status(
        &self,
        doctor_id: Uuid,
        target: DoctorStatus,
    ) -> AppResult<DoctorStatus> {
        let doctor = self.find_doctor(doctor_id).await?;
        let event = doctor.status.review_event_for(target)?;
        self.apply(doctor_id, doctor.status, event).await
    }
}
