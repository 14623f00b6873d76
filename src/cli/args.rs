//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

/// Hospital booking service
#[derive(Parser, Debug)]
#[command(name = "hospital-booking")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage admin accounts
    Admin(AdminArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = DEFAULT_SERVER_HOST, env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT, env = "SERVER_PORT")]
    pub port: u16,
}

impl ServeArgs {
    /// Socket address to bind, as `host:port`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Apply pending migrations
    Up,
    /// Undo the newest migrations
    Down {
        /// How many migrations to undo
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// List migrations and whether each is applied
    Status,
    /// Drop all tables, including every account and appointment, and rebuild
    Fresh {
        /// Confirm the data loss
        #[arg(long)]
        yes: bool,
    },
}

/// Arguments for the admin command
#[derive(Parser, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub action: AdminAction,
}

/// Admin account actions
#[derive(Subcommand, Debug)]
pub enum AdminAction {
    /// Create an admin account
    Create(CreateAdminArgs),
}

/// Credentials for a new admin
#[derive(Args, Debug)]
pub struct CreateAdminArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Login email
    #[arg(long)]
    pub email: String,

    /// Password (minimum 8 characters)
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults_to_port_5000() {
        let cli = Cli::try_parse_from(["hospital-booking", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.addr(), "0.0.0.0:5000"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_migrate_down_defaults_to_one_step() {
        let cli = Cli::try_parse_from(["hospital-booking", "migrate", "down"]).unwrap();
        match cli.command {
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Down { steps },
            }) => assert_eq!(steps, 1),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_migrate_fresh_is_unconfirmed_by_default() {
        let cli = Cli::try_parse_from(["hospital-booking", "migrate", "fresh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Fresh { yes: false }
            })
        ));
    }

    #[test]
    fn test_admin_create_parses_credentials() {
        let cli = Cli::try_parse_from([
            "hospital-booking",
            "admin",
            "create",
            "--name",
            "Root",
            "--email",
            "root@hospital.example",
            "--password",
            "password123",
        ])
        .unwrap();

        let Commands::Admin(AdminArgs {
            action: AdminAction::Create(args),
        }) = cli.command
        else {
            panic!("expected admin create");
        };
        assert_eq!(args.email, "root@hospital.example");
    }
}
