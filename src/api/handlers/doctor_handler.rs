//! Doctor handlers: the appointment queue, leave requests and patient
//! records.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    AppointmentResponse, AppointmentStatus, DoctorAppointmentView, DoctorStatus, PatientRecord,
    ProfileResponse,
};
use crate::errors::AppResult;

/// Resolution of a pending appointment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AppointmentStatusRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    #[schema(example = "completed")]
    pub status: String,
}

/// Doctor status after a leave or return request
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = "Leave requested")]
    pub message: String,
    pub status: DoctorStatus,
}

/// Create doctor routes
pub fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(my_appointments))
        .route("/appointment/:id", put(update_appointment))
        .route("/leave", post(request_leave))
        .route("/return-work", post(request_return))
        .route("/profile", get(my_profile))
        .route("/patient/:id", get(patient_record))
}

/// The calling doctor's appointments
#[utoipa::path(
    get,
    path = "/doctor/appointments",
    tag = "Doctor",
    responses(
        (status = 200, description = "Appointment queue", body = Vec<DoctorAppointmentView>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a doctor")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_appointments(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<DoctorAppointmentView>>> {
    let queue = state
        .appointment_service
        .doctor_queue(current_user.id)
        .await?;

    Ok(Json(queue))
}

/// Mark one of the caller's pending appointments completed or rejected
#[utoipa::path(
    put,
    path = "/doctor/appointment/{id}",
    tag = "Doctor",
    params(("id" = uuid::Uuid, Path, description = "Appointment ID")),
    request_body = AppointmentStatusRequest,
    responses(
        (status = 200, description = "Appointment resolved", body = AppointmentResponse),
        (status = 400, description = "Status is not completed or rejected"),
        (status = 404, description = "No pending appointment with this id for the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<AppointmentStatusRequest>,
) -> AppResult<Json<AppointmentResponse>> {
    let status: AppointmentStatus = payload.status.trim().parse()?;
    let appointment = state
        .appointment_service
        .set_status(current_user.id, id, status)
        .await?;

    Ok(Json(AppointmentResponse::from(appointment)))
}

/// Ask the admin for leave
#[utoipa::path(
    post,
    path = "/doctor/leave",
    tag = "Doctor",
    responses(
        (status = 200, description = "Leave requested", body = LeaveResponse),
        (status = 409, description = "Not active")
    ),
    security(("bearer_auth" = []))
)]
pub async fn request_leave(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<LeaveResponse>> {
    let status = state.doctor_service.request_leave(current_user.id).await?;

    Ok(Json(LeaveResponse {
        message: "Leave requested".to_string(),
        status,
    }))
}

/// Ask the admin to return to work
#[utoipa::path(
    post,
    path = "/doctor/return-work",
    tag = "Doctor",
    responses(
        (status = 200, description = "Return requested", body = LeaveResponse),
        (status = 409, description = "Not on leave")
    ),
    security(("bearer_auth" = []))
)]
pub async fn request_return(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<LeaveResponse>> {
    let status = state.doctor_service.request_return(current_user.id).await?;

    Ok(Json(LeaveResponse {
        message: "Return to work requested".to_string(),
        status,
    }))
}

/// The calling doctor's profile
#[utoipa::path(
    get,
    path = "/doctor/profile",
    tag = "Doctor",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 404, description = "Account no longer exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ProfileResponse>> {
    Ok(Json(state.user_service.profile(current_user.id).await?))
}

/// A patient's profile and full booking history
#[utoipa::path(
    get,
    path = "/doctor/patient/{id}",
    tag = "Doctor",
    params(("id" = uuid::Uuid, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient record", body = PatientRecord),
        (status = 404, description = "Patient not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn patient_record(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<PatientRecord>> {
    Ok(Json(state.user_service.patient_record(id).await?))
}
