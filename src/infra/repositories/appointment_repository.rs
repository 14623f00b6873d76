//! Appointment ledger repository.
//!
//! The ledger relies on the partial unique index
//! `(doctor_id, date, time) WHERE status <> 'rejected'`: inserts that would
//! create a second live appointment on a slot fail with `SlotConflict`, and
//! status changes are conditional updates on `status = 'pending'`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::appointment::{self, ActiveModel, Entity as AppointmentEntity};
use crate::config::{APPOINTMENT_COMPLETED, APPOINTMENT_PENDING, APPOINTMENT_REJECTED};
use crate::domain::{Appointment, AppointmentStatus, Slot};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Appointment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert a pending appointment. A live appointment on the same slot
    /// yields `SlotConflict`.
    async fn insert_pending(&self, slot: Slot, patient_id: Uuid) -> AppResult<Appointment>;

    /// Find the appointment currently holding `slot`, if any
    async fn find_active_in_slot(&self, slot: Slot) -> AppResult<Option<Appointment>>;

    /// Set the status of a pending appointment owned by `doctor_id`.
    ///
    /// Returns `None` when no pending appointment with that id belongs to
    /// the doctor.
    async fn resolve(
        &self,
        id: Uuid,
        doctor_id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<Option<Appointment>>;

    async fn list_for_doctor(&self, doctor_id: Uuid) -> AppResult<Vec<Appointment>>;

    async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<Appointment>>;

    async fn list_all(&self) -> AppResult<Vec<Appointment>>;

    /// Number of completed appointments of one doctor
    async fn count_completed(&self, doctor_id: Uuid) -> AppResult<u64>;

    /// Completed appointment counts per doctor; doctors with none are absent
    async fn completed_counts(&self) -> AppResult<HashMap<Uuid, u64>>;
}

/// Concrete implementation of AppointmentRepository
pub struct AppointmentStore {
    db: DatabaseConnection,
}

impl AppointmentStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn list_where(&self, column: appointment::Column, id: Uuid) -> AppResult<Vec<Appointment>> {
        let models = AppointmentEntity::find()
            .filter(column.eq(id))
            .order_by_asc(appointment::Column::Date)
            .order_by_asc(appointment::Column::Time)
            .all(&self.db)
            .await?;

        into_appointments(models)
    }
}

fn into_appointments(models: Vec<appointment::Model>) -> AppResult<Vec<Appointment>> {
    models.into_iter().map(Appointment::try_from).collect()
}

#[async_trait]
impl AppointmentRepository for AppointmentStore {
    async fn insert_pending(&self, slot: Slot, patient_id: Uuid) -> AppResult<Appointment> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            doctor_id: Set(slot.doctor_id),
            patient_id: Set(patient_id),
            date: Set(slot.date),
            time: Set(slot.time),
            status: Set(APPOINTMENT_PENDING.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            let err = AppError::from(e);
            if err.is_unique_violation() {
                AppError::SlotConflict
            } else {
                err
            }
        })?;

        Appointment::try_from(model)
    }

    async fn find_active_in_slot(&self, slot: Slot) -> AppResult<Option<Appointment>> {
        AppointmentEntity::find()
            .filter(appointment::Column::DoctorId.eq(slot.doctor_id))
            .filter(appointment::Column::Date.eq(slot.date))
            .filter(appointment::Column::Time.eq(slot.time))
            .filter(appointment::Column::Status.ne(APPOINTMENT_REJECTED))
            .one(&self.db)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn resolve(
        &self,
        id: Uuid,
        doctor_id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<Option<Appointment>> {
        let result = AppointmentEntity::update_many()
            .col_expr(appointment::Column::Status, Expr::value(status.as_str()))
            .col_expr(appointment::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(appointment::Column::Id.eq(id))
            .filter(appointment::Column::DoctorId.eq(doctor_id))
            .filter(appointment::Column::Status.eq(APPOINTMENT_PENDING))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        AppointmentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> AppResult<Vec<Appointment>> {
        self.list_where(appointment::Column::DoctorId, doctor_id).await
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<Appointment>> {
        self.list_where(appointment::Column::PatientId, patient_id).await
    }

    async fn list_all(&self) -> AppResult<Vec<Appointment>> {
        let models = AppointmentEntity::find()
            .order_by_asc(appointment::Column::Date)
            .order_by_asc(appointment::Column::Time)
            .all(&self.db)
            .await?;

        into_appointments(models)
    }

    async fn count_completed(&self, doctor_id: Uuid) -> AppResult<u64> {
        let count = AppointmentEntity::find()
            .filter(appointment::Column::DoctorId.eq(doctor_id))
            .filter(appointment::Column::Status.eq(APPOINTMENT_COMPLETED))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn completed_counts(&self) -> AppResult<HashMap<Uuid, u64>> {
        let rows: Vec<(Uuid, i64)> = AppointmentEntity::find()
            .select_only()
            .column(appointment::Column::DoctorId)
            .column_as(Expr::col(appointment::Column::Id).count(), "completed")
            .filter(appointment::Column::Status.eq(APPOINTMENT_COMPLETED))
            .group_by(appointment::Column::DoctorId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(doctor_id, count)| (doctor_id, count.max(0) as u64))
            .collect())
    }
}
