//! Authentication service - Registration, login and session tokens.
//!
//! Tokens are HS256 JWTs carrying `{id, role, name, iat, exp}`; the role
//! claim is what the route gate checks.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, DUMMY_PASSWORD_HASH, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub role: UserRole,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
    /// Role of the authenticated user
    pub role: UserRole,
    /// Display name of the authenticated user
    #[schema(example = "Jane Roe")]
    pub name: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new patient account
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User>;

    /// Create an admin account (operator bootstrap)
    async fn create_admin(&self, name: String, email: String, password: String)
        -> AppResult<User>;

    /// Check credentials and issue a session token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Sign a token for the given identity
    fn issue_token(&self, id: Uuid, role: UserRole, name: &str) -> AppResult<String>;

    /// Verify a token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Lowercased, trimmed form under which emails are stored and looked up
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim a required free-text field, rejecting it if nothing is left.
pub fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    async fn create_account(
        &self,
        name: String,
        email: String,
        password: String,
        role: UserRole,
    ) -> AppResult<User> {
        let email = normalize_email(&email);
        let name = required_text("Name", &name)?;

        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = Password::new(&password)?.into_string();
        let new_user = match role {
            UserRole::Admin => NewUser::admin(name, email, password_hash),
            _ => NewUser::patient(name, email, password_hash),
        };

        // Concurrent registrations are caught by the unique email index
        let user = self.uow.users().create(new_user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "Account created");
        Ok(user)
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User> {
        self.create_account(name, email, password, UserRole::Patient)
            .await
    }

    async fn create_admin(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<User> {
        self.create_account(name, email, password, UserRole::Admin)
            .await
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self
            .uow
            .users()
            .find_by_email(&normalize_email(&email))
            .await?;

        // Verify against a dummy hash for unknown emails so both failure
        // paths cost the same
        let stored = Password::from_hash(
            user.as_ref()
                .map(|u| u.password_hash.as_str())
                .unwrap_or(DUMMY_PASSWORD_HASH),
        );
        let password_valid = stored.verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::warn!("Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.issue_token(user.id, user.role, &user.name)?;
        tracing::info!(user_id = %user.id, role = %user.role, "Login succeeded");

        Ok(TokenResponse {
            token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.config.jwt_expiration_hours * SECONDS_PER_HOUR,
            role: user.role,
            name: user.name,
        })
    }

    fn issue_token(&self, id: Uuid, role: UserRole, name: &str) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.jwt_expiration_hours);

        let claims = Claims {
            id,
            role,
            name: name.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )?;

        Ok(token)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }
}
