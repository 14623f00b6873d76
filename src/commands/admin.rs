//! Admin command - Bootstraps operator accounts.
//!
//! Admins cannot self-register over HTTP; the first one is created here.

use crate::cli::args::{AdminAction, AdminArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the admin command
pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let services = Services::from_connection(db.get_connection(), config);

    match args.action {
        AdminAction::Create(create) => {
            let admin = services
                .auth()
                .create_admin(create.name, create.email, create.password)
                .await?;

            tracing::info!(admin_id = %admin.id, "Admin account created");
            println!("Created admin {} <{}>", admin.name, admin.email);
        }
    }

    Ok(())
}
