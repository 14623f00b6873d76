//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{DoctorStatus, User, UserRole};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub specialization: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Unknown role or status strings are a decode error.
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role: UserRole = model.role.parse().map_err(|_| {
            AppError::internal(format!("User {} has unknown role '{}'", model.id, model.role))
        })?;
        let status: DoctorStatus = model.status.parse().map_err(|_| {
            AppError::internal(format!("User {} has unknown status '{}'", model.id, model.status))
        })?;

        Ok(User {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            role,
            specialization: model.specialization,
            age: model.age,
            phone: model.phone,
            photo: model.photo,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
