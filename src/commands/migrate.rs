//! Migrate command - Schema management for the users and appointments tables.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, MigrationState};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    if let MigrateAction::Fresh { yes: false } = args.action {
        return Err(AppError::validation(
            "migrate fresh drops every account and appointment; pass --yes to confirm",
        ));
    }

    // Plain connect: `Database::connect` would apply migrations on its own
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            let applied = db.apply_pending().await.map_err(failed("apply"))?;
            if applied == 0 {
                println!("Schema is up to date");
            } else {
                tracing::info!(applied, "Migrations applied");
                println!("Applied {} migration(s)", applied);
            }
        }
        MigrateAction::Down { steps } => {
            tracing::warn!(steps, "Rolling back migrations");
            db.roll_back(steps).await.map_err(failed("roll back"))?;
            println!("Rolled back {} migration(s)", steps);
        }
        MigrateAction::Status => {
            let states = db.migration_states().await.map_err(failed("read"))?;
            print!("{}", render_status(&states));
        }
        MigrateAction::Fresh { .. } => {
            tracing::warn!("Dropping all tables and rebuilding the schema");
            db.rebuild().await.map_err(failed("rebuild"))?;
            println!("Schema rebuilt; create an admin with `admin create`");
        }
    }

    Ok(())
}

fn failed(step: &'static str) -> impl Fn(DbErr) -> AppError {
    move |e| AppError::internal(format!("Could not {} migrations: {}", step, e))
}

/// One line per migration followed by a summary line.
fn render_status(states: &[MigrationState]) -> String {
    let width = states.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();

    for state in states {
        let mark = if state.applied { "applied" } else { "pending" };
        out.push_str(&format!("{:<width$}  {}\n", state.name, mark, width = width));
    }

    let applied = states.iter().filter(|s| s.applied).count();
    out.push_str(&format!(
        "{} applied, {} pending\n",
        applied,
        states.len() - applied
    ));
    out
}
