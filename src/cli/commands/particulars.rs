use clap::Subcommand;
use serde_json::json;
use std::sync::Arc;

use crate::cli::utils::{connect_store, output_record, output_success};
use crate::cli::OutputFormat;
use crate::config;
use crate::database::Store;
use crate::services::{RandomGenerator, RegistrationService};

#[derive(Subcommand)]
pub enum ParticularsCommands {
    #[command(about = "Show the particulars stored for a device or account id")]
    Show {
        #[arg(help = "Device or account id")]
        id: String,
    },

    #[command(about = "Issue a new login password and print it once")]
    ResetPassword {
        #[arg(help = "Device or account id")]
        id: String,
    },
}

pub async fn handle(cmd: ParticularsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ParticularsCommands::Show { id } => {
            let store = connect_store().await?;
            let record = store
                .find_particulars(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("no particulars for '{}'", id))?;

            output_record(&output_format, &serde_json::to_value(&record)?)
        }
        ParticularsCommands::ResetPassword { id } => {
            let settings = config::config();
            let store = Arc::new(connect_store().await?);
            let registration = RegistrationService::new(
                store.clone(),
                Arc::new(RandomGenerator::from_entropy()),
                settings.registration.clone(),
                settings.security.password_hash_cost,
            );

            let password = registration
                .reset_password(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("no particulars for '{}'", id))?;
            let email = store
                .find_particulars(&id)
                .await?
                .map(|record| record.caregiver_email)
                .unwrap_or_default();

            output_success(
                &output_format,
                &format!("Password reset for '{}': {} / {}", id, email, password),
                Some(json!({ "id": id, "email": email, "password": password })),
            )
        }
    }
}
