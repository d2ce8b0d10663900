use crate::auth::session_store::AuthSession;
use crate::error::ApiError;
use crate::types::Role;

/// Which devices a session may read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    AllDevices,
    Device(String),
}

impl Visibility {
    /// Device filter for store queries; `None` means unrestricted
    pub fn device_filter(&self) -> Option<&str> {
        match self {
            Visibility::AllDevices => None,
            Visibility::Device(id) => Some(id),
        }
    }

    pub fn allows(&self, device_id: &str) -> bool {
        match self {
            Visibility::AllDevices => true,
            Visibility::Device(id) => id == device_id,
        }
    }
}

impl AuthSession {
    pub fn visibility(&self) -> Visibility {
        match self.role {
            Role::Admin => Visibility::AllDevices,
            Role::Caregiver => Visibility::Device(self.device_id.clone()),
        }
    }

    /// Gate for endpoints that name a single device
    pub fn authorize_device(&self, device_id: &str) -> Result<(), ApiError> {
        if self.visibility().allows(device_id) {
            return Ok(());
        }
        tracing::warn!(
            "Forbidden: {} session for '{}' requested device '{}'",
            self.role,
            self.device_id,
            device_id
        );
        Err(ApiError::forbidden("Unauthorized access"))
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
