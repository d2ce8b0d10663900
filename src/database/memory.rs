use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{LatestStatus, StatusEvent, UserParticulars};
use crate::database::store::Store;

#[derive(Default)]
struct Collections {
    // Insertion order doubles as the tie-breaker for equal `recorded_at`
    events: Vec<StatusEvent>,
    particulars: HashMap<String, UserParticulars>,
}

/// Process-local store used by tests and `STORE_BACKEND=memory`.
/// Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_status(&self, event: &StatusEvent) -> Result<(), DatabaseError> {
        self.inner.write().await.events.push(event.clone());
        Ok(())
    }

    async fn insert_particulars_if_absent(
        &self,
        particulars: &UserParticulars,
    ) -> Result<bool, DatabaseError> {
        let mut inner = self.inner.write().await;
        if inner.particulars.contains_key(&particulars.id) {
            return Ok(false);
        }
        if inner
            .particulars
            .values()
            .any(|p| p.caregiver_email == particulars.caregiver_email)
        {
            return Err(DatabaseError::Conflict("user_particulars_email_idx".to_string()));
        }
        inner.particulars.insert(particulars.id.clone(), particulars.clone());
        Ok(true)
    }

    async fn set_password_hash(&self, id: &str, hash: &str) -> Result<bool, DatabaseError> {
        let mut inner = self.inner.write().await;
        match inner.particulars.get_mut(id) {
            Some(record) => {
                record.password_hash = hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_particulars(&self, id: &str) -> Result<Option<UserParticulars>, DatabaseError> {
        Ok(self.inner.read().await.particulars.get(id).cloned())
    }

    async fn find_particulars_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserParticulars>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner
            .particulars
            .values()
            .find(|p| p.caregiver_email == email)
            .cloned())
    }

    async fn history(&self, device_id: &str) -> Result<Vec<StatusEvent>, DatabaseError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<StatusEvent> = inner
            .events
            .iter()
            .rev()
            .filter(|e| e.device_id == device_id)
            .cloned()
            .collect();
        // Stable sort keeps later insertions first among equal instants
        rows.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(rows)
    }

    async fn latest_statuses(
        &self,
        device_id: Option<&str>,
    ) -> Result<Vec<LatestStatus>, DatabaseError> {
        let inner = self.inner.read().await;
        let mut latest: BTreeMap<&str, &StatusEvent> = BTreeMap::new();
        for event in &inner.events {
            if device_id.is_some_and(|id| id != event.device_id) {
                continue;
            }
            match latest.get(event.device_id.as_str()) {
                Some(current) if current.recorded_at > event.recorded_at => {}
                _ => {
                    latest.insert(event.device_id.as_str(), event);
                }
            }
        }
        Ok(latest.values().map(|e| LatestStatus::from(*e)).collect())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone, Utc};

    fn event(device: &str, status: &str, minute: i64) -> StatusEvent {
        let base = Utc.with_ymd_and_hms(2025, 1, 31, 23, 0, 0).unwrap();
        let sgt = FixedOffset::east_opt(8 * 3600).unwrap();
        StatusEvent::new(device, status, base + Duration::minutes(minute), sgt)
    }

    fn particulars(id: &str, email: &str) -> UserParticulars {
        UserParticulars {
            id: id.to_string(),
            elderly_name: "Tan Ah Kow".to_string(),
            elderly_address: "#04-1234, 570, 560570".to_string(),
            caregiver_name: "John Lim".to_string(),
            caregiver_phone: "+65 91234567".to_string(),
            caregiver_email: email.to_string(),
            password_hash: "unused".to_string(),
            role: "caregiver".to_string(),
        }
    }

    #[tokio::test]
    async fn latest_uses_instant_not_display_string() {
        let store = MemoryStore::new();
        // 23:30 UTC on Jan 31 renders as "07:30:00 01/02/25", which sorts below
        // "23:59:00 31/01/25" as a string even though it is later.
        store.insert_status(&event("dev1", "OK", -421)).await.unwrap();
        store.insert_status(&event("dev1", "FALL", 30)).await.unwrap();
        store.insert_status(&event("dev2", "OK", 0)).await.unwrap();

        let rows = store.latest_statuses(None).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].device_id, "dev1");
        assert_eq!(rows[0].latest_status, "FALL");
        assert_eq!(rows[1].device_id, "dev2");

        let only = store.latest_statuses(Some("dev2")).await.unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].device_id, "dev2");
    }

    #[tokio::test]
    async fn history_is_newest_first_with_ties_by_insertion() {
        let store = MemoryStore::new();
        store.insert_status(&event("dev1", "first", 0)).await.unwrap();
        store.insert_status(&event("dev1", "second", 0)).await.unwrap();
        store.insert_status(&event("dev1", "third", 5)).await.unwrap();
        store.insert_status(&event("other", "x", 10)).await.unwrap();

        let statuses: Vec<String> = store
            .history("dev1")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.status)
            .collect();
        assert_eq!(statuses, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_first_record() {
        let store = MemoryStore::new();
        assert!(store.insert_particulars_if_absent(&particulars("dev1", "a@x")).await.unwrap());

        let mut second = particulars("dev1", "b@x");
        second.caregiver_name = "Someone Else".to_string();
        assert!(!store.insert_particulars_if_absent(&second).await.unwrap());

        let stored = store.find_particulars("dev1").await.unwrap().unwrap();
        assert_eq!(stored.caregiver_email, "a@x");
        assert!(store.find_particulars_by_email("b@x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        store.insert_particulars_if_absent(&particulars("dev1", "a@x")).await.unwrap();
        let err = store
            .insert_particulars_if_absent(&particulars("dev2", "a@x"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn password_hash_is_replaced_in_place() {
        let store = MemoryStore::new();
        store.insert_particulars_if_absent(&particulars("dev1", "a@x")).await.unwrap();

        assert!(store.set_password_hash("dev1", "rotated").await.unwrap());
        assert!(!store.set_password_hash("ghost", "rotated").await.unwrap());

        let stored = store.find_particulars("dev1").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "rotated");
        assert_eq!(stored.caregiver_email, "a@x");
    }
}
