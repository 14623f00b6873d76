//! Domain layer - Core business entities and logic
//!
//! Roles, statuses and lifecycle events are closed enums; their string
//! forms only appear at the persistence and wire boundaries.

pub mod appointment;
pub mod lifecycle;
pub mod password;
pub mod user;

pub use appointment::{
    AdminAppointmentView, Appointment, AppointmentResponse, AppointmentStatus, BookingRequest,
    DoctorAppointmentView, HistoryEntry, PatientAppointmentView, PatientRecord, Slot,
};
pub use lifecycle::{DoctorStatus, LifecycleEvent};
pub use password::Password;
pub use user::{
    DoctorProfile, DoctorResponse, NewUser, PatientSummary, ProfileResponse, User, UserResponse,
    UserRole,
};
