//! Patient handlers: the doctor directory, booking and history.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use crate::api::extractors::IdPath;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    AppointmentResponse, BookingRequest, DoctorResponse, PatientAppointmentView, ProfileResponse,
};
use crate::errors::{AppError, AppResult};
use crate::types::Created;

/// Create patient routes
pub fn patient_routes() -> Router<AppState> {
    Router::new()
        .route("/doctors", get(list_doctors))
        .route("/doctors/:id", get(get_doctor))
        .route("/book", post(book))
        .route("/history", get(history))
        .route("/profile", get(my_profile))
}

/// Doctors with their experience counts
#[utoipa::path(
    get,
    path = "/patient/doctors",
    tag = "Patient",
    responses(
        (status = 200, description = "All doctors", body = Vec<DoctorResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a patient")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_doctors(State(state): State<AppState>) -> AppResult<Json<Vec<DoctorResponse>>> {
    Ok(Json(state.doctor_service.list_doctors().await?))
}

/// A single doctor
#[utoipa::path(
    get,
    path = "/patient/doctors/{id}",
    tag = "Patient",
    params(("id" = uuid::Uuid, Path, description = "Doctor ID")),
    responses(
        (status = 200, description = "Doctor", body = DoctorResponse),
        (status = 404, description = "Doctor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_doctor(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<DoctorResponse>> {
    Ok(Json(state.doctor_service.get_doctor(id).await?))
}

/// Book a slot with a doctor
#[utoipa::path(
    post,
    path = "/patient/book",
    tag = "Patient",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Appointment booked (pending)", body = AppointmentResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 404, description = "Doctor not found"),
        (status = 409, description = "Slot already booked or doctor on leave")
    ),
    security(("bearer_auth" = []))
)]
pub async fn book(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> AppResult<Created<AppointmentResponse>> {
    let Json(request) = payload.map_err(|e| AppError::validation(e.body_text()))?;

    let appointment = state
        .appointment_service
        .book(current_user.id, request)
        .await?;

    Ok(Created(AppointmentResponse::from(appointment)))
}

/// The calling patient's bookings
#[utoipa::path(
    get,
    path = "/patient/history",
    tag = "Patient",
    responses(
        (status = 200, description = "Booking history", body = Vec<PatientAppointmentView>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn history(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<PatientAppointmentView>>> {
    let history = state
        .appointment_service
        .patient_history(current_user.id)
        .await?;

    Ok(Json(history))
}

/// The calling patient's profile
#[utoipa::path(
    get,
    path = "/patient/profile",
    tag = "Patient",
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
