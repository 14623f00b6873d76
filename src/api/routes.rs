//! Application route configuration.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{admin_routes, auth_routes, doctor_routes, patient_routes};
use super::middleware::{require_roles, RouteGuard};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::UPLOADS_URL_PREFIX;
use crate::domain::UserRole;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let guard = |roles: &'static [UserRole]| {
        middleware::from_fn_with_state(
            RouteGuard::new(state.auth_service.clone(), roles),
            require_roles,
        )
    };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(state.photos.root()))
        // Public
        .nest("/auth", auth_routes())
        // Role-gated groups
        .nest(
            "/admin",
            admin_routes()
                .route_layer(guard(&[UserRole::Admin]))
                .layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .nest("/doctor", doctor_routes().route_layer(guard(&[UserRole::Doctor])))
        .nest("/patient", patient_routes().route_layer(guard(&[UserRole::Patient])))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Hospital booking API"
}

/// Health check response. Failure causes stay in the server log.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Health check endpoint with a database round trip
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.database.ping().await {
        Ok(_) => (StatusCode::OK, Json(HealthResponse { status: "healthy" })),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse { status: "unhealthy" }),
            )
        }
    }
}
