use serde::Serialize;
use std::sync::Arc;

use crate::auth::AuthSession;
use crate::database::models::UserParticulars;
use crate::database::Store;
use crate::error::ApiError;

/// Particulars as an admin sees them. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullParticulars {
    pub id: String,
    pub elderly_name: String,
    pub elderly_address: String,
    pub caregiver_name: String,
    pub caregiver_phone: String,
    pub caregiver_email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidentParticulars {
    pub id: String,
    pub elderly_name: String,
    pub elderly_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParticularsView {
    Full(FullParticulars),
    Resident(ResidentParticulars),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaregiverContact {
    pub caregiver_name: String,
    pub caregiver_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caregiver_email: Option<String>,
}

impl ParticularsView {
    pub fn project(record: UserParticulars, admin: bool) -> Self {
        if admin {
            ParticularsView::Full(FullParticulars {
                id: record.id,
                elderly_name: record.elderly_name,
                elderly_address: record.elderly_address,
                caregiver_name: record.caregiver_name,
                caregiver_phone: record.caregiver_phone,
                caregiver_email: record.caregiver_email,
                role: record.role,
            })
        } else {
            ParticularsView::Resident(ResidentParticulars {
                id: record.id,
                elderly_name: record.elderly_name,
                elderly_address: record.elderly_address,
            })
        }
    }
}

impl CaregiverContact {
    pub fn project(record: UserParticulars, admin: bool) -> Self {
        Self {
            caregiver_name: record.caregiver_name,
            caregiver_phone: record.caregiver_phone,
            caregiver_email: admin.then_some(record.caregiver_email),
        }
    }
}

/// Gate first, then look up: caregivers probing other ids learn nothing about them
#[derive(Clone)]
pub struct ParticularsService {
    store: Arc<dyn Store>,
}

impl ParticularsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn load(
        &self,
        session: &AuthSession,
        device_id: &str,
    ) -> Result<UserParticulars, ApiError> {
        session.authorize_device(device_id)?;
        self.store
            .find_particulars(device_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User details not found"))
    }

    pub async fn user_particulars(
        &self,
        session: &AuthSession,
        device_id: &str,
    ) -> Result<ParticularsView, ApiError> {
        let record = self.load(session, device_id).await?;
        Ok(ParticularsView::project(record, session.is_admin()))
    }

    pub async fn caregiver_particulars(
        &self,
        session: &AuthSession,
        device_id: &str,
    ) -> Result<CaregiverContact, ApiError> {
        let record = self.load(session, device_id).await?;
        Ok(CaregiverContact::project(record, session.is_admin()))
    }
}
