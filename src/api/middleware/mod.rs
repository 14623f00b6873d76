//! API middleware.

mod auth;

pub use auth::{require_roles, CurrentUser, RouteGuard};
