//! Grow Smart CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! grow-cli migrate
//!
//! # Seed government schemes from a YAML file
//! grow-cli seed schemes -f seeds/schemes.yaml
//!
//! # Grant the admin role to an account
//! grow-cli admin grant -e admin@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed schemes` - Load government scheme entries from YAML
//! - `admin grant` / `admin revoke` - Manage the admin role

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "grow-cli")]
#[command(author, version, about = "Grow Smart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed database content
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage the admin role
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Load government scheme entries from a YAML file
    Schemes {
        /// Path to the YAML file
        #[arg(short, long)]
        file: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin role to an account
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Revoke the admin role from an account
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Schemes { file } => commands::seed::schemes(&file).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => {
                commands::admin::set_role(&email, grow_smart_core::UserRole::Admin).await?;
            }
            AdminAction::Revoke { email } => {
                commands::admin::set_role(&email, grow_smart_core::UserRole::Farmer).await?;
            }
        },
    }
    Ok(())
}
