//! Admin handlers: doctor onboarding, removal, lifecycle reviews and the
//! hospital-wide listings.

use axum::{
    extract::{Multipart, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{format_validation_errors, IdPath, ValidatedJson};
use crate::api::AppState;
use crate::domain::{
    AdminAppointmentView, DoctorProfile, DoctorResponse, DoctorStatus, PatientSummary,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UploadedPhoto;
use crate::types::{Created, MessageResponse};

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}$").expect("phone pattern is a valid regex"));

/// Text fields of the doctor onboarding form, after multipart decoding
#[derive(Debug, Default, Validate)]
pub struct DoctorForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Specialization is required"))]
    pub specialization: String,
    #[validate(range(min = 18, max = 100, message = "Age must be between 18 and 100"))]
    pub age: Option<i32>,
    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be 10 digits"))]
    pub phone: Option<String>,
}

/// Multipart onboarding request, documented for OpenAPI only
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct DoctorUpload {
    #[schema(example = "Dr. A")]
    name: String,
    #[schema(example = "dr.a@hospital.example")]
    email: String,
    #[schema(example = "SecurePass123!", min_length = 8)]
    password: String,
    #[schema(example = "Cardiology")]
    specialization: String,
    #[schema(example = 45)]
    age: Option<i32>,
    #[schema(example = "5551234567")]
    phone: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    photo: Option<Vec<u8>>,
}

/// Target state for a pending doctor request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StatusChangeRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    #[schema(example = "on_leave")]
    pub status: String,
}

/// Result of an admin review
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusChangeResponse {
    #[schema(example = "Doctor status updated")]
    pub message: String,
    pub status: DoctorStatus,
}

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/doctor", post(add_doctor))
        .route("/doctors", get(list_doctors))
        .route("/doctor/:id", delete(remove_doctor))
        .route("/doctor/:id/status", put(review_doctor_status))
        .route("/appointments", get(list_appointments))
        .route("/patients", get(list_patients))
}

/// Onboard a doctor from a multipart form
#[utoipa::path(
    post,
    path = "/admin/doctor",
    tag = "Admin",
    request_body(content = DoctorUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Doctor created", body = DoctorResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Email already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_doctor(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Created<DoctorResponse>> {
    let (form, photo) = read_doctor_form(multipart).await?;
    form.validate()
        .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

    let photo_path = match photo {
        Some(photo) => Some(state.photos.save(&photo).await?),
        None => None,
    };

    let profile = DoctorProfile {
        name: form.name,
        email: form.email,
        specialization: form.specialization,
        age: form.age,
        phone: form.phone,
        photo: photo_path.clone(),
    };

    match state.doctor_service.onboard(profile, form.password).await {
        Ok(doctor) => Ok(Created(doctor)),
        Err(e) => {
            if let Some(path) = photo_path {
                state.photos.remove(&path).await;
            }
            Err(e)
        }
    }
}

/// List doctors with their experience counts
#[utoipa::path(
    get,
    path = "/admin/doctors",
    tag = "Admin",
    responses(
        (status = 200, description = "All doctors", body = Vec<DoctorResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_doctors(State(state): State<AppState>) -> AppResult<Json<Vec<DoctorResponse>>> {
    Ok(Json(state.doctor_service.list_doctors().await?))
}

/// Delete a doctor account
#[utoipa::path(
    delete,
    path = "/admin/doctor/{id}",
    tag = "Admin",
    params(("id" = uuid::Uuid, Path, description = "Doctor ID")),
    responses(
        (status = 200, description = "Doctor removed", body = MessageResponse),
        (status = 404, description = "Doctor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_doctor(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<MessageResponse>> {
    let doctor = state.doctor_service.remove(id).await?;

    if let Some(photo) = doctor.photo.as_deref() {
        state.photos.remove(photo).await;
    }

    Ok(Json(MessageResponse::new("Doctor removed")))
}

/// Approve or reject a doctor's pending leave or return request
#[utoipa::path(
    put,
    path = "/admin/doctor/{id}/status",
    tag = "Admin",
    params(("id" = uuid::Uuid, Path, description = "Doctor ID")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status changed", body = StatusChangeResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Doctor not found"),
        (status = 409, description = "No matching pending request")
    ),
    security(("bearer_auth" = []))
)]
pub async fn review_doctor_status(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<StatusChangeRequest>,
) -> AppResult<Json<StatusChangeResponse>> {
    let target: DoctorStatus = payload.status.parse()?;
    let status = state.doctor_service.review_status(id, target).await?;

    Ok(Json(StatusChangeResponse {
        message: "Doctor status updated".to_string(),
        status,
    }))
}

/// The full appointment ledger with doctor and patient names
#[utoipa::path(
    get,
    path = "/admin/appointments",
    tag = "Admin",
    responses(
        (status = 200, description = "All appointments", body = Vec<AdminAppointmentView>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_appointments(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AdminAppointmentView>>> {
    Ok(Json(state.appointment_service.list_all().await?))
}

/// All registered patients
#[utoipa::path(
    get,
    path = "/admin/patients",
    tag = "Admin",
    responses(
        (status = 200, description = "All patients", body = Vec<PatientSummary>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_patients(State(state): State<AppState>) -> AppResult<Json<Vec<PatientSummary>>> {
    Ok(Json(state.user_service.list_patients().await?))
}

/// Drain the multipart body into the form fields and an optional photo.
async fn read_doctor_form(
    mut multipart: Multipart,
) -> AppResult<(DoctorForm, Option<UploadedPhoto>)> {
    let mut name = None;
    let mut email = None;
    let mut password = None;
    let mut specialization = None;
    let mut age = None;
    let mut phone = None;
    let mut photo = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed form data: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        if field_name == "photo" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Malformed photo: {}", e)))?;

            if !bytes.is_empty() {
                photo = Some(UploadedPhoto {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::validation(format!("Malformed field {}: {}", field_name, e)))?;
        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }

        match field_name.as_str() {
            "name" => name = Some(value),
            "email" => email = Some(value),
            "password" => password = Some(value),
            "specialization" => specialization = Some(value),
            "age" => age = Some(value),
            "phone" => phone = Some(value),
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    let (Some(name), Some(email), Some(password), Some(specialization)) =
        (name, email, password, specialization)
    else {
        return Err(AppError::validation("All fields are required"));
    };

    let age = age
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|_| AppError::validation("Age must be a number"))
        })
        .transpose()?;

    let form = DoctorForm {
        name,
        email,
        password,
        specialization,
        age,
        phone,
    };

    Ok((form, photo))
}
