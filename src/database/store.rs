use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{LatestStatus, StatusEvent, UserParticulars};

/// Storage seam shared by the request handlers, the registration path and the CLI.
///
/// Implementations must make `insert_particulars_if_absent` atomic: two
/// concurrent calls for the same id leave exactly one record behind and
/// exactly one of them observes `true`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Append one status event
    async fn insert_status(&self, event: &StatusEvent) -> Result<(), DatabaseError>;

    /// Insert unless a record with the same id exists. Returns whether it was inserted.
    async fn insert_particulars_if_absent(
        &self,
        particulars: &UserParticulars,
    ) -> Result<bool, DatabaseError>;

    /// Replace the stored password hash. Returns false when no record has that id.
    async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<bool, DatabaseError>;

    async fn find_particulars(&self, id: &str) -> Result<Option<UserParticulars>, DatabaseError>;

    async fn find_particulars_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserParticulars>, DatabaseError>;

    /// All events for one device, newest first
    async fn history(&self, device_id: &str) -> Result<Vec<StatusEvent>, DatabaseError>;

    /// Newest event per device, optionally narrowed to a single device
    async fn latest_statuses(
        &self,
        device_id: Option<&str>,
    ) -> Result<Vec<LatestStatus>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
