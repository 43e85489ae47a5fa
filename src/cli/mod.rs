pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "racehub")]
#[command(about = "RaceHub CLI - operator tasks for the RaceHub API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print a bcrypt hash for a password")]
    HashPassword {
        #[arg(help = "Password to hash")]
        password: String,
        #[arg(long, default_value_t = bcrypt::DEFAULT_COST, help = "bcrypt cost factor")]
        cost: u32,
    },

    #[command(about = "Apply database migrations (uses DATABASE_URL)")]
    Migrate,

    #[command(about = "Grant a role to a user")]
    GrantRole {
        #[arg(long, help = "User email")]
        email: String,
        #[arg(long, help = "admin, organizer or runner")]
        role: String,
    },

    #[command(about = "Revoke a role from a user")]
    RevokeRole {
        #[arg(long, help = "User email")]
        email: String,
        #[arg(long, help = "admin, organizer or runner")]
        role: String,
    },

    #[command(about = "Auth rate limiter management on a running server")]
    RateLimit {
        #[command(subcommand)]
        cmd: commands::rate_limit::RateLimitCommands,
    },

    #[command(about = "Check server health status from the /health endpoint")]
    Health {
        #[arg(long, default_value = commands::DEFAULT_SERVER_URL, help = "Server base URL")]
        url: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::HashPassword { password, cost } => commands::password::hash(&password, cost, output_format),
        Commands::Migrate => commands::database::migrate(output_format).await,
        Commands::GrantRole { email, role } => commands::roles::grant(&email, &role, output_format).await,
        Commands::RevokeRole { email, role } => commands::roles::revoke(&email, &role, output_format).await,
        Commands::RateLimit { cmd } => commands::rate_limit::handle(cmd, output_format).await,
        Commands::Health { url } => commands::server::health(&url, output_format).await,
    }
}
