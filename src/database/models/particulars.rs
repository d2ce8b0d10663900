use serde::Serialize;
use sqlx::FromRow;

use crate::types::Role;

/// Identity record attached to a device id. One per device, write-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserParticulars {
    pub id: String,
    pub elderly_name: String,
    pub elderly_address: String,
    pub caregiver_name: String,
    pub caregiver_phone: String,
    pub caregiver_email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: String,
}

impl UserParticulars {
    /// Unknown role strings are treated as no role at all
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}
