use clap::Subcommand;

use crate::cli::utils::{connect_store, output_success};
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create tables and indices if missing")]
    Init,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Init => {
            let store = connect_store().await?;
            DatabaseManager::ensure_schema(store.pool()).await?;
            output_success(&output_format, "Database schema ready", None)
        }
    }
}
