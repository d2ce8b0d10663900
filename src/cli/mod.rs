pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "carewatch")]
#[command(about = "CareWatch CLI - administration and device simulation for the CareWatch API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Database schema management")]
    Db {
        #[command(subcommand)]
        cmd: commands::db::DbCommands,
    },

    #[command(about = "Administrator account management")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },

    #[command(about = "Inspect stored particulars")]
    Particulars {
        #[command(subcommand)]
        cmd: commands::particulars::ParticularsCommands,
    },

    #[command(about = "Simulate a monitoring device against a running server")]
    Device {
        #[command(subcommand)]
        cmd: commands::device::DeviceCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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
        Commands::Db { cmd } => commands::db::handle(cmd, output_format).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, output_format).await,
        Commands::Particulars { cmd } => commands::particulars::handle(cmd, output_format).await,
        Commands::Device { cmd } => commands::device::handle(cmd, output_format).await,
    }
}
