//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::lifecycle::DoctorStatus;
use crate::config::{ROLE_ADMIN, ROLE_DOCTOR, ROLE_PATIENT};
use crate::errors::AppError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Doctor,
    Patient,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Doctor => ROLE_DOCTOR,
            UserRole::Patient => ROLE_PATIENT,
        }
    }

    /// Check if this role is one of `allowed`
    pub fn is_any_of(self, allowed: &[UserRole]) -> bool {
        allowed.contains(&self)
    }
}

impl std::str::FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(UserRole::Admin),
            ROLE_DOCTOR => Ok(UserRole::Doctor),
            ROLE_PATIENT => Ok(UserRole::Patient),
            other => Err(AppError::validation(format!("Unknown role: {}", other))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub specialization: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    /// Lifecycle status; always `Active` for admins and patients
    pub status: DoctorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_doctor(&self) -> bool {
        self.role == UserRole::Doctor
    }

    pub fn is_patient(&self) -> bool {
        self.role == UserRole::Patient
    }

    /// Whether patients may book this user as a doctor
    pub fn is_bookable(&self) -> bool {
        self.is_doctor() && self.status.is_bookable()
    }
}

/// Data for a user about to be persisted. The password is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub specialization: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub photo: Option<String>,
}

impl NewUser {
    fn with_role(name: String, email: String, password_hash: String, role: UserRole) -> Self {
        Self {
            name,
            email,
            password_hash,
            role,
            specialization: None,
            age: None,
            phone: None,
            photo: None,
        }
    }

    pub fn patient(name: String, email: String, password_hash: String) -> Self {
        Self::with_role(name, email, password_hash, UserRole::Patient)
    }

    pub fn admin(name: String, email: String, password_hash: String) -> Self {
        Self::with_role(name, email, password_hash, UserRole::Admin)
    }

    pub fn doctor(profile: DoctorProfile, password_hash: String) -> Self {
        Self {
            name: profile.name,
            email: profile.email,
            password_hash,
            role: UserRole::Doctor,
            specialization: Some(profile.specialization),
            age: profile.age,
            phone: profile.phone,
            photo: profile.photo,
        }
    }
}

/// Professional details collected when onboarding a doctor
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorProfile {
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub age: Option<i32>,
    pub phone: Option<String>,
    /// Public path of an already stored photo
    pub photo: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Display name
    #[schema(example = "Jane Roe")]
    pub name: String,
    /// Email address
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// User role
    #[schema(example = "patient")]
    pub role: UserRole,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Doctor as shown to admins and patients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DoctorResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Dr. A")]
    pub name: String,
    #[schema(example = "dr.a@hospital.example")]
    pub email: String,
    #[schema(example = "Cardiology")]
    pub specialization: Option<String>,
    pub age: Option<i32>,
    #[schema(example = "5551234567")]
    pub phone: Option<String>,
    /// Public path of the doctor's photo
    #[schema(example = "/uploads/9b2f0c1e.png")]
    pub photo: Option<String>,
    pub status: DoctorStatus,
    /// Number of completed appointments
    pub experience_count: u64,
}

impl DoctorResponse {
    pub fn new(user: User, experience_count: u64) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            specialization: user.specialization,
            age: user.age,
            phone: user.phone,
            photo: user.photo,
            status: user.status,
            experience_count,
        }
    }
}

/// Compact patient view
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PatientSummary {
    pub id: Uuid,
    #[schema(example = "Jane Roe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
}

impl From<User> for PatientSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// A user's own profile
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: DoctorStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
            specialization: user.specialization,
            photo: user.photo,
            age: user.age,
            phone: user.phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, status: DoctorStatus) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Dr. A".into(),
            email: "a@example.com".into(),
            password_hash: "hash".into(),
            role,
            specialization: Some("Cardiology".into()),
            age: None,
            phone: None,
            photo: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_role_parsing_is_closed() {
        assert_eq!("doctor".parse::<UserRole>().unwrap(), UserRole::Doctor);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("superuser".parse::<UserRole>().is_err());
        assert!("Doctor".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_membership() {
        assert!(UserRole::Doctor.is_any_of(&[UserRole::Doctor]));
        assert!(!UserRole::Patient.is_any_of(&[UserRole::Admin, UserRole::Doctor]));
    }

    #[test]
    fn test_only_doctors_are_bookable() {
        assert!(user(UserRole::Doctor, DoctorStatus::Active).is_bookable());
        assert!(!user(UserRole::Doctor, DoctorStatus::OnLeave).is_bookable());
        assert!(!user(UserRole::Doctor, DoctorStatus::LeaveRequested).is_bookable());
        assert!(!user(UserRole::Patient, DoctorStatus::Active).is_bookable());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let json = serde_json::to_value(user(UserRole::Patient, DoctorStatus::Active)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "patient");
    }

    #[test]
    fn test_doctor_response_carries_experience() {
        let doctor = user(UserRole::Doctor, DoctorStatus::Active);
        let response = DoctorResponse::new(doctor, 3);
        assert_eq!(response.experience_count, 3);
        assert_eq!(response.specialization.as_deref(), Some("Cardiology"));
    }

    #[test]
    fn test_new_doctor_has_specialization() {
        let profile = DoctorProfile {
            name: "Dr. A".into(),
            email: "a@example.com".into(),
            specialization: "Cardiology".into(),
            age: Some(40),
            phone: None,
            photo: None,
        };
        let new_user = NewUser::doctor(profile, "hash".into());
        assert_eq!(new_user.role, UserRole::Doctor);
        assert_eq!(new_user.specialization.as_deref(), Some("Cardiology"));
    }
}
