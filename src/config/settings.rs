//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_MAX_UPLOAD_BYTES,
    DEFAULT_UPLOADS_DIR, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("uploads_dir", &self.uploads_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl Config {
    /// Build a configuration with defaults for everything except the
    /// database URL and signing secret.
    ///
    /// # Errors
    /// Returns a validation error if the secret is shorter than
    /// `MIN_JWT_SECRET_LENGTH`.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::validation(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: database_url.into(),
            jwt_secret,
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        })
    }

    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// A missing `JWT_SECRET` falls back to an insecure default in debug
    /// builds only.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let mut config = Self::new(database_url, jwt_secret)?;

        if let Some(hours) = env_parse("JWT_EXPIRATION_HOURS") {
            config.jwt_expiration_hours = hours;
        }
        if let Ok(dir) = env::var("UPLOADS_DIR") {
            config.uploads_dir = PathBuf::from(dir);
        }
        if let Some(bytes) = env_parse("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = bytes;
        }

        Ok(config)
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        let result = Config::new("sqlite::memory:", "too-short");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::new("sqlite::memory:", "a".repeat(32)).unwrap();
        assert_eq!(config.jwt_expiration_hours, 1);
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("postgres://user:pw@db/hospital", "s".repeat(40)).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("pw@db"));
        assert!(!debug.contains(&"s".repeat(40)));
    }
}
