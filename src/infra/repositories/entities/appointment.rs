//! Appointment database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Appointment, AppointmentStatus};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: Date,
    pub time: Time,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

// Users are referenced by id only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Appointment {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status: AppointmentStatus = model.status.parse().map_err(|_| {
            AppError::internal(format!(
                "Appointment {} has unknown status '{}'",
                model.id, model.status
            ))
        })?;

        Ok(Appointment {
            id: model.id,
            doctor_id: model.doctor_id,
            patient_id: model.patient_id,
            date: model.date,
            time: model.time,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
