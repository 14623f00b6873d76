//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::ROLE_DOCTOR;
use crate::domain::{DoctorStatus, NewUser, User, UserRole};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find every user whose id is in `ids`; missing ids are skipped
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;

    /// List users with the given role, oldest first
    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;

    /// Persist a new user. A taken email yields `DuplicateEmail`.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Delete a user with role doctor
    async fn delete_doctor(&self, id: Uuid) -> AppResult<()>;

    /// Move a doctor from `from` to `to` only if the stored status is still
    /// `from`. Returns whether the row was updated.
    async fn transition_status(
        &self,
        id: Uuid,
        from: DoctorStatus,
        to: DoctorStatus,
    ) -> AppResult<bool>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_users(models: Vec<user::Model>) -> AppResult<Vec<User>> {
    models.into_iter().map(User::try_from).collect()
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        into_users(models)
    }

    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;

        into_users(models)
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.as_str().to_string()),
            specialization: Set(new_user.specialization),
            age: Set(new_user.age),
            phone: Set(new_user.phone),
            photo: Set(new_user.photo),
            status: Set(DoctorStatus::Active.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            let err = AppError::from(e);
            if err.is_unique_violation() {
                AppError::DuplicateEmail
            } else {
                err
            }
        })?;

        User::try_from(model)
    }

    async fn delete_doctor(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_many()
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::Role.eq(ROLE_DOCTOR))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Doctor"));
        }

        Ok(())
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: DoctorStatus,
        to: DoctorStatus,
    ) -> AppResult<bool> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::Status, Expr::value(to.as_str()))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::Role.eq(ROLE_DOCTOR))
            .filter(user::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
