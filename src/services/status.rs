use std::sync::Arc;

use crate::auth::AuthSession;
use crate::database::models::{LatestStatus, StatusEvent};
use crate::database::Store;
use crate::error::ApiError;

/// Read path for status events, filtered through the session's visibility
#[derive(Clone)]
pub struct StatusService {
    store: Arc<dyn Store>,
}

impl StatusService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// One row per visible device. Caregivers get at most their own device.
    pub async fn latest(&self, session: &AuthSession) -> Result<Vec<LatestStatus>, ApiError> {
        let visibility = session.visibility();
        let rows = self.store.latest_statuses(visibility.device_filter()).await?;
        Ok(rows)
    }

    /// Full history for one device, newest first
    pub async fn history(
        &self,
        session: &AuthSession,
        device_id: &str,
    ) -> Result<Vec<StatusEvent>, ApiError> {
        session.authorize_device(device_id)?;
        let rows = self.store.history(device_id).await?;
        Ok(rows)
    }
}
