//! Appointment service - Booking, doctor-side resolution and ledger views.
//!
//! Booking correctness rests on the ledger's unique index over live slots.
//! The pre-check here only turns the common case into an early
//! `SlotConflict`; a concurrent insert that slips past it is rejected by
//! the store with the same error.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::UNKNOWN_USER_NAME;
use crate::domain::{
    AdminAppointmentView, Appointment, AppointmentStatus, BookingRequest, DoctorAppointmentView,
    PatientAppointmentView, User,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Appointment service trait for dependency injection.
#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// Book a slot for `patient_id`; the appointment starts pending
    async fn book(&self, patient_id: Uuid, request: BookingRequest) -> AppResult<Appointment>;

    /// Resolve a pending appointment owned by `doctor_id`
    async fn set_status(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<Appointment>;

    /// A doctor's queue with patient contact details
    async fn doctor_queue(&self, doctor_id: Uuid) -> AppResult<Vec<DoctorAppointmentView>>;

    /// A patient's bookings with doctor details
    async fn patient_history(&self, patient_id: Uuid) -> AppResult<Vec<PatientAppointmentView>>;

    /// Every appointment in the ledger with both parties named
    async fn list_all(&self) -> AppResult<Vec<AdminAppointmentView>>;
}

/// Concrete implementation of AppointmentService using Unit of Work.
pub struct AppointmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AppointmentManager<U> {
    /// Create new appointment service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Load the users referenced by `ids`, keyed by id
    async fn users_by_id(&self, ids: impl IntoIterator<Item = Uuid>) -> AppResult<HashMap<Uuid, User>> {
        let ids: Vec<Uuid> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();
        let users = self.uow.users().find_by_ids(ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}

fn name_of(users: &HashMap<Uuid, User>, id: &Uuid) -> String {
    users
        .get(id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string())
}

#[async_trait]
impl<U: UnitOfWork> AppointmentService for AppointmentManager<U> {
    async fn book(&self, patient_id: Uuid, request: BookingRequest) -> AppResult<Appointment> {
        let slot = request.into_slot()?;

        let doctor = self
            .uow
            .users()
            .find_by_id(slot.doctor_id)
            .await?
            .filter(User::is_doctor)
            .ok_or_not_found("Doctor")?;

        if !doctor.is_bookable() {
            tracing::warn!(doctor_id = %doctor.id, status = %doctor.status, "Booking refused, doctor unavailable");
            return Err(AppError::DoctorUnavailable);
        }

        let appointments = self.uow.appointments();
        if appointments.find_active_in_slot(slot).await?.is_some() {
            tracing::warn!(doctor_id = %slot.doctor_id, date = %slot.date, time = %slot.time, "Slot already booked");
            return Err(AppError::SlotConflict);
        }

        let appointment = appointments.insert_pending(slot, patient_id).await.map_err(|e| {
            if matches!(e, AppError::SlotConflict) {
                tracing::warn!(doctor_id = %slot.doctor_id, "Slot taken by a concurrent booking");
            }
            e
        })?;

        tracing::info!(
            appointment_id = %appointment.id,
            doctor_id = %appointment.doctor_id,
            %patient_id,
            "Appointment booked"
        );
        Ok(appointment)
    }

    async fn set_status(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<Appointment> {
        if !status.is_resolution() {
            return Err(AppError::validation(
                "Status must be either completed or rejected",
            ));
        }

        let appointment = self
            .uow
            .appointments()
            .resolve(appointment_id, doctor_id, status)
            .await?
            .ok_or_not_found("Appointment")?;

        tracing::info!(%appointment_id, %doctor_id, %status, "Appointment resolved");
        Ok(appointment)
    }

    async fn doctor_queue(&self, doctor_id: Uuid) -> AppResult<Vec<DoctorAppointmentView>> {
        let appointments = self.uow.appointments().list_for_doctor(doctor_id).await?;
        let patients = self
            .users_by_id(appointments.iter().map(|a| a.patient_id))
            .await?;

        Ok(appointments
            .into_iter()
            .map(|a| {
                let patient = patients.get(&a.patient_id);
                DoctorAppointmentView {
                    id: a.id,
                    date: a.date,
                    time: a.time,
                    status: a.status,
                    patient_id: a.patient_id,
                    patient_name: name_of(&patients, &a.patient_id),
                    patient_email: patient
                        .map(|p| p.email.clone())
                        .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string()),
                }
            })
            .collect())
    }

    async fn patient_history(&self, patient_id: Uuid) -> AppResult<Vec<PatientAppointmentView>> {
        let appointments = self.uow.appointments().list_for_patient(patient_id).await?;
        let doctors = self
            .users_by_id(appointments.iter().map(|a| a.doctor_id))
            .await?;

        Ok(appointments
            .into_iter()
            .map(|a| PatientAppointmentView {
                id: a.id,
                date: a.date,
                time: a.time,
                status: a.status,
                doctor_id: a.doctor_id,
                doctor_name: name_of(&doctors, &a.doctor_id),
                specialization: doctors
                    .get(&a.doctor_id)
                    .and_then(|d| d.specialization.clone())
                    .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string()),
            })
            .collect())
    }

    async fn list_all(&self) -> AppResult<Vec<AdminAppointmentView>> {
        let appointments = self.uow.appointments().list_all().await?;
        let users = self
            .users_by_id(
                appointments
                    .iter()
                    .flat_map(|a| [a.doctor_id, a.patient_id]),
            )
            .await?;

        Ok(appointments
            .into_iter()
            .map(|a| AdminAppointmentView {
                id: a.id,
                date: a.date,
                time: a.time,
                status: a.status,
                doctor_id: a.doctor_id,
                doctor_name: name_of(&users, &a.doctor_id),
                patient_id: a.patient_id,
                patient_name: name_of(&users, &a.patient_id),
            })
            .collect())
    }
}
