//! User service - Profiles and patient records.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::config::UNKNOWN_USER_NAME;
use crate::domain::{HistoryEntry, PatientRecord, PatientSummary, ProfileResponse, User, UserRole};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Profile of the given user
    async fn profile(&self, id: Uuid) -> AppResult<ProfileResponse>;

    /// All patients
    async fn list_patients(&self) -> AppResult<Vec<PatientSummary>>;

    /// A patient's profile together with every appointment they booked
    async fn patient_record(&self, patient_id: Uuid) -> AppResult<PatientRecord>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_patient(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .filter(User::is_patient)
            .ok_or_not_found("Patient")
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn profile(&self, id: Uuid) -> AppResult<ProfileResponse> {
        let user = self.uow.users().find_by_id(id).await?.ok_or_not_found("User")?;
        Ok(ProfileResponse::from(user))
    }

    async fn list_patients(&self) -> AppResult<Vec<PatientSummary>> {
        let patients = self.uow.users().list_by_role(UserRole::Patient).await?;
        Ok(patients.into_iter().map(PatientSummary::from).collect())
    }

    async fn patient_record(&self, patient_id: Uuid) -> AppResult<PatientRecord> {
        let appointments = self.uow.appointments();

        let (patient, history) = parallel::join2(
            self.find_patient(patient_id),
            appointments.list_for_patient(patient_id),
        )
        .await?;

        let mut doctor_ids: Vec<Uuid> = history.iter().map(|a| a.doctor_id).collect();
        doctor_ids.sort_unstable();
        doctor_ids.dedup();

        let doctors: HashMap<Uuid, String> = self
            .uow
            .users()
            .find_by_ids(doctor_ids)
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();

        let history = history
            .into_iter()
            .map(|a| HistoryEntry {
                date: a.date,
                time: a.time,
                status: a.status,
                doctor_name: doctors
                    .get(&a.doctor_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string()),
            })
            .collect();

        Ok(PatientRecord {
            profile: PatientSummary::from(patient),
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Appointment, AppointmentStatus, DoctorStatus};
    use crate::errors::AppError;
    use crate::infra::{MockAppointmentRepository, MockUserRepository, Persistence};
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn user(role: UserRole, name: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "hash".into(),
            role,
            specialization: None,
            age: None,
            phone: None,
            photo: None,
            status: DoctorStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn manager(
        users: MockUserRepository,
        appointments: MockAppointmentRepository,
    ) -> UserManager<Persistence> {
        let uow = Persistence::with_repositories(Arc::new(users), Arc::new(appointments));
        UserManager::new(Arc::new(uow))
    }

    #[tokio::test]
    async fn test_patient_record_names_doctors() {
        let patient = user(UserRole::Patient, "Pat");
        let doctor = user(UserRole::Doctor, "House");
        let patient_id = patient.id;
        let doctor_id = doctor.id;
        let now = Utc::now();
        let history = vec![Appointment {
            id: Uuid::new_v4(),
            doctor_id,
            patient_id,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            status: AppointmentStatus::Completed,
            created_at: now,
            updated_at: now,
        }];

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(patient.clone())));
        users
            .expect_find_by_ids()
            .withf(move |ids| ids == &vec![doctor_id])
            .returning(move |_| Ok(vec![doctor.clone()]));
        let mut appointments = MockAppointmentRepository::new();
        appointments
            .expect_list_for_patient()
            .returning(move |_| Ok(history.clone()));

        let record = manager(users, appointments)
            .patient_record(patient_id)
            .await
            .unwrap();

        assert_eq!(record.profile.name, "Pat");
        assert_eq!(record.history.len(), 1);
        assert_eq!(record.history[0].doctor_name, "House");
        assert_eq!(record.history[0].status, AppointmentStatus::Completed);
    }

    #[tokio::test]
    async fn test_patient_record_requires_patient() {
        let doctor = user(UserRole::Doctor, "House");
        let id = doctor.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(doctor.clone())));
        let mut appointments = MockAppointmentRepository::new();
        appointments
            .expect_list_for_patient()
            .returning(|_| Ok(Vec::new()));

        let result = manager(users, appointments).patient_record(id).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_patients_maps_summaries() {
        let mut users = MockUserRepository::new();
        users
            .expect_list_by_role()
            .returning(|_| Ok(vec![user(UserRole::Patient, "Ann"), user(UserRole::Patient, "Bob")]));

        let patients = manager(users, MockAppointmentRepository::new())
            .list_patients()
            .await
            .unwrap();

        let names: Vec<_> = patients.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Ann", "Bob"]);
    }
}
