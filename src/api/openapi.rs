//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{admin_handler, auth_handler, doctor_handler, patient_handler};
use crate::domain::{
    AdminAppointmentView, AppointmentResponse, AppointmentStatus, BookingRequest,
    DoctorAppointmentView, DoctorResponse, DoctorStatus, HistoryEntry, PatientAppointmentView,
    PatientRecord, PatientSummary, ProfileResponse, UserResponse, UserRole,
};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the hospital booking API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hospital Booking API",
        version = "0.1.0",
        description = "Appointment booking with role-gated admin, doctor and patient surfaces"
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        admin_handler::add_doctor,
        admin_handler::list_doctors,
        admin_handler::remove_doctor,
        admin_handler::review_doctor_status,
        admin_handler::list_appointments,
        admin_handler::list_patients,
        doctor_handler::my_appointments,
        doctor_handler::update_appointment,
        doctor_handler::request_leave,
        doctor_handler::request_return,
        doctor_handler::my_profile,
        doctor_handler::patient_record,
        patient_handler::list_doctors,
        patient_handler::get_doctor,
        patient_handler::book,
        patient_handler::history,
        patient_handler::my_profile,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            DoctorStatus,
            DoctorResponse,
            PatientSummary,
            ProfileResponse,
            AppointmentStatus,
            AppointmentResponse,
            BookingRequest,
            DoctorAppointmentView,
            PatientAppointmentView,
            AdminAppointmentView,
            HistoryEntry,
            PatientRecord,
            MessageResponse,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            // Handler types
            admin_handler::DoctorUpload,
            admin_handler::StatusChangeRequest,
            admin_handler::StatusChangeResponse,
            doctor_handler::AppointmentStatusRequest,
            doctor_handler::LeaveResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Patient registration and login"),
        (name = "Admin", description = "Doctor management and hospital-wide listings"),
        (name = "Doctor", description = "Appointment queue and leave requests"),
        (name = "Patient", description = "Doctor directory and booking")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/auth/login",
            "/admin/doctor/{id}/status",
            "/doctor/appointment/{id}",
            "/patient/book",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }
}
