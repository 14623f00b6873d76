//! Appointment ledger entries and their views.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::PatientSummary;
use crate::config::{
    APPOINTMENT_CANCELLED, APPOINTMENT_COMPLETED, APPOINTMENT_PENDING, APPOINTMENT_REJECTED,
    DATE_FORMAT, TIME_FORMATS,
};
use crate::errors::{AppError, AppResult};

/// Appointment status. `Cancelled` is representable but no flow produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Rejected,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => APPOINTMENT_PENDING,
            AppointmentStatus::Completed => APPOINTMENT_COMPLETED,
            AppointmentStatus::Rejected => APPOINTMENT_REJECTED,
            AppointmentStatus::Cancelled => APPOINTMENT_CANCELLED,
        }
    }

    /// Whether a doctor may move a pending appointment to this status
    pub fn is_resolution(self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Rejected)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            APPOINTMENT_PENDING => Ok(AppointmentStatus::Pending),
            APPOINTMENT_COMPLETED => Ok(AppointmentStatus::Completed),
            APPOINTMENT_REJECTED => Ok(AppointmentStatus::Rejected),
            APPOINTMENT_CANCELLED => Ok(AppointmentStatus::Cancelled),
            other => Err(AppError::validation(format!("Unknown appointment status: {}", other))),
        }
    }
}

/// A single bookable slot of one doctor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Appointment domain entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking request as received from a patient.
///
/// Fields are optional so a missing field surfaces as a validation error
/// rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookingRequest {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub doctor_id: Option<Uuid>,
    #[schema(example = "2025-06-01")]
    pub date: Option<String>,
    #[schema(example = "10:00")]
    pub time: Option<String>,
}

impl BookingRequest {
    /// Check presence and parse the requested slot.
    pub fn into_slot(self) -> AppResult<Slot> {
        let (Some(doctor_id), Some(date), Some(time)) = (self.doctor_id, self.date, self.time)
        else {
            return Err(AppError::validation("All fields are required"));
        };

        Ok(Slot {
            doctor_id,
            date: parse_date(&date)?,
            time: parse_time(&time)?,
        })
    }
}

pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("Invalid date: {} (expected YYYY-MM-DD)", raw)))
}

pub fn parse_time(raw: &str) -> AppResult<NaiveTime> {
    let raw_trimmed = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw_trimmed, format).ok())
        .ok_or_else(|| AppError::validation(format!("Invalid time: {} (expected HH:MM)", raw)))
}

/// Appointment response returned after booking
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    #[schema(value_type = String, example = "2025-06-01")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            date: appointment.date,
            time: appointment.time,
            status: appointment.status,
            created_at: appointment.created_at,
        }
    }
}

/// Entry in a doctor's appointment queue
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DoctorAppointmentView {
    pub id: Uuid,
    #[schema(value_type = String, example = "2025-06-01")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub patient_email: String,
}

/// Entry in a patient's booking history
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PatientAppointmentView {
    pub id: Uuid,
    #[schema(value_type = String, example = "2025-06-01")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub specialization: String,
}

/// Ledger entry as seen by admins
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminAppointmentView {
    pub id: Uuid,
    #[schema(value_type = String, example = "2025-06-01")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub patient_id: Uuid,
    pub patient_name: String,
}

/// One line of a patient's history shown to a doctor
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryEntry {
    #[schema(value_type = String, example = "2025-06-01")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub doctor_name: String,
}

/// A patient's profile together with their full history
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PatientRecord {
    pub profile: PatientSummary,
    pub history: Vec<HistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(doctor: bool, date: Option<&str>, time: Option<&str>) -> BookingRequest {
        BookingRequest {
            doctor_id: doctor.then(Uuid::new_v4),
            date: date.map(String::from),
            time: time.map(String::from),
        }
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        for req in [
            request(false, Some("2025-06-01"), Some("10:00")),
            request(true, None, Some("10:00")),
            request(true, Some("2025-06-01"), None),
        ] {
            assert!(matches!(req.into_slot(), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_slot_parses_both_time_formats() {
        let short = request(true, Some("2025-06-01"), Some("10:00")).into_slot().unwrap();
        let long = request(true, Some("2025-06-01"), Some("10:00:00")).into_slot().unwrap();
        assert_eq!(short.time, long.time);
        assert_eq!(short.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn test_malformed_date_and_time() {
        assert!(parse_date("01/06/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("ten").is_err());
    }

    #[test]
    fn test_status_semantics() {
        assert!(AppointmentStatus::Completed.is_resolution());
        assert!(AppointmentStatus::Rejected.is_resolution());
        assert!(!AppointmentStatus::Pending.is_resolution());
        assert!(!AppointmentStatus::Cancelled.is_resolution());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("completed".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::Completed);
        assert!("done".parse::<AppointmentStatus>().is_err());
    }
}
