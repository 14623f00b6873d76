//! Role gate for protected route groups.
//!
//! Each route group carries a [`RouteGuard`] naming the roles it admits.
//! A missing bearer token is `Unauthorized`, a bad or expired token is
//! `InvalidToken`/`ExpiredToken`, and a valid token with the wrong role is
//! `Forbidden`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::domain::UserRole;
use crate::errors::AppError;
use crate::services::AuthService;

/// Authenticated identity attached to requests that pass the gate
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
    pub name: String,
}

/// State for [`require_roles`]: token verifier plus the admitted roles
#[derive(Clone)]
pub struct RouteGuard {
    auth: Arc<dyn AuthService>,
    allowed: &'static [UserRole],
}

impl RouteGuard {
    pub fn new(auth: Arc<dyn AuthService>, allowed: &'static [UserRole]) -> Self {
        Self { auth, allowed }
    }

    /// Resolve the identity behind `token` and check it is admitted.
    pub fn authorize(&self, token: Option<&str>) -> Result<CurrentUser, AppError> {
        let token = token.ok_or(AppError::Unauthorized)?;
        let claims = self.auth.verify_token(token)?;

        if !claims.role.is_any_of(self.allowed) {
            tracing::warn!(user_id = %claims.id, role = %claims.role, "Role not admitted");
            return Err(AppError::Forbidden);
        }

        Ok(CurrentUser {
            id: claims.id,
            role: claims.role,
            name: claims.name,
        })
    }
}

/// Gate middleware; use with `middleware::from_fn_with_state(guard, require_roles)`.
pub async fn require_roles(
    State(guard): State<RouteGuard>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer.as_ref().map(|TypedHeader(auth)| auth.token());
    let current_user = guard.authorize(token)?;

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
