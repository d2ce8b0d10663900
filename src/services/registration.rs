use chrono::{FixedOffset, Offset, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::auth::password::{hash_password_blocking, PasswordError};
use crate::config::RegistrationConfig;
use crate::database::models::{StatusEvent, UserParticulars};
use crate::database::{DatabaseError, Store};
use crate::services::generator::ParticularsGenerator;
use crate::types::Role;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Store(#[from] DatabaseError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

#[derive(Debug, Clone)]
pub struct StatusReceipt {
    pub device_id: String,
    pub timestamp: String,
    /// Whether this report created the device's particulars
    pub provisioned: bool,
}

/// Write path for device reports: provision particulars on first sighting, then append the event.
///
/// Generated passwords are never handed back to the reporting device. An
/// operator obtains a working login through `reset_password`.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn Store>,
    generator: Arc<dyn ParticularsGenerator>,
    settings: RegistrationConfig,
    offset: FixedOffset,
    hash_cost: u32,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn Store>,
        generator: Arc<dyn ParticularsGenerator>,
        settings: RegistrationConfig,
        hash_cost: u32,
    ) -> Self {
        let offset =
            FixedOffset::east_opt(settings.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
        Self {
            store,
            generator,
            settings,
            offset,
            hash_cost,
        }
    }

    /// Particulars are settled before the event is written; a provisioning
    /// failure writes no event.
    pub async fn record_status(
        &self,
        device_id: &str,
        status: &str,
    ) -> Result<StatusReceipt, RegistrationError> {
        let provisioned = self.ensure_particulars(device_id).await?;

        let event = StatusEvent::new(device_id, status, Utc::now(), self.offset);
        self.store.insert_status(&event).await?;

        Ok(StatusReceipt {
            device_id: event.device_id,
            timestamp: event.timestamp,
            provisioned,
        })
    }

    /// Issue a fresh password for an existing account and return its cleartext.
    /// `None` when no particulars exist for `id`.
    pub async fn reset_password(&self, id: &str) -> Result<Option<String>, RegistrationError> {
        let password = self.new_password();
        let hash = hash_password_blocking(password.clone(), self.hash_cost).await?;

        if !self.store.set_password_hash(id, &hash).await? {
            return Ok(None);
        }

        info!("Password reset for {}", id);
        Ok(Some(password))
    }

    /// Create particulars for an unseen device. The existence check is only a fast
    /// path; the insert itself decides who wins when two first sightings race.
    async fn ensure_particulars(&self, device_id: &str) -> Result<bool, RegistrationError> {
        if self.store.find_particulars(device_id).await?.is_some() {
            return Ok(false);
        }

        info!("New node detected ({}) - generating user particulars", device_id);
        let password_hash = hash_password_blocking(self.new_password(), self.hash_cost).await?;
        let particulars = self.synthesize(device_id, password_hash);

        if !self.store.insert_particulars_if_absent(&particulars).await? {
            tracing::debug!("Particulars for {} created concurrently, keeping existing", device_id);
            return Ok(false);
        }

        info!("User particulars created for node {}", device_id);
        Ok(true)
    }

    fn new_password(&self) -> String {
        format!("P@ss{}", self.generator.password_suffix())
    }

    /// Build a caregiver record for `device_id` around an already-hashed password
    pub fn synthesize(&self, device_id: &str, password_hash: String) -> UserParticulars {
        let g = &self.generator;

        let elderly_address = format!(
            "#{:02}-{}, {}, {}",
            g.unit_floor(),
            g.unit_number(),
            self.settings.residence_block,
            self.settings.residence_postal
        );
        let caregiver_name = g.caregiver_name();

        UserParticulars {
            id: device_id.to_string(),
            elderly_name: g.elderly_name().to_string(),
            elderly_address,
            caregiver_name: caregiver_name.to_string(),
            caregiver_phone: format!("+65 9{}", g.phone_suffix()),
            caregiver_email: caregiver_email(
                caregiver_name,
                device_id,
                &self.settings.email_domain,
            ),
            password_hash,
            role: Role::Caregiver.as_str().to_string(),
        }
    }
}

/// `"John Lim"`, `"dev1"`, `"gmail.com"` → `john.limdev1@gmail.com`
pub fn caregiver_email(name: &str, device_id: &str, domain: &str) -> String {
    format!("{}{}@{}", name.to_lowercase().replace(' ', "."), device_id, domain)
}
