use clap::Subcommand;
use serde_json::json;

use crate::auth::password::hash_password;
use crate::config;
use crate::cli::utils::{connect_store, output_success};
use crate::cli::OutputFormat;
use crate::database::models::UserParticulars;
use crate::database::Store;
use crate::types::Role;

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Create an administrator account")]
    Create {
        #[arg(long, help = "Account id shown in login responses")]
        id: String,
        #[arg(long, help = "Login email")]
        email: String,
        #[arg(long, help = "Login password (stored hashed)")]
        password: String,
        #[arg(long, default_value = "Administrator", help = "Display name")]
        name: String,
    },
}

pub async fn handle(cmd: AdminCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AdminCommands::Create { id, email, password, name } => {
            if password.len() < 8 {
                anyhow::bail!("admin password must be at least 8 characters");
            }

            let store = connect_store().await?;
            let cost = config::config().security.password_hash_cost;
            let password_hash = hash_password(&password, cost)?;
            let account = admin_account(&id, &email, password_hash, &name);

            if !store.insert_particulars_if_absent(&account).await? {
                anyhow::bail!("an account with id '{}' already exists", id);
            }

            output_success(
                &output_format,
                &format!("Admin '{}' created", id),
                Some(json!({ "id": id, "email": email, "role": Role::Admin })),
            )
        }
    }
}

/// Admins reuse the particulars record; resident fields stay empty
pub fn admin_account(id: &str, email: &str, password_hash: String, name: &str) -> UserParticulars {
    UserParticulars {
        id: id.to_string(),
        elderly_name: String::new(),
        elderly_address: String::new(),
        caregiver_name: name.to_string(),
        caregiver_phone: String::new(),
        caregiver_email: email.to_string(),
        password_hash,
        role: Role::Admin.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;

    #[test]
    fn admin_account_is_hashed_admin() {
        let hash = hash_password("correct horse", 4).unwrap();
        let account = admin_account("ops", "ops@example.com", hash, "Ops");
        assert_eq!(account.role(), Some(Role::Admin));
        assert_ne!(account.password_hash, "correct horse");
        assert!(verify_password("correct horse", &account.password_hash));
    }
}
