use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::types::Role;

/// Authenticated session context, injected into protected requests
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub session_id: Uuid,
    pub device_id: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Server-held sessions keyed by the opaque id carried in the cookie
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, AuthSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `device_id`/`role`, dropping any expired entries on the way
    pub async fn create(&self, device_id: &str, role: Role, ttl_hours: u64) -> AuthSession {
        let now = Utc::now();
        let session = AuthSession {
            session_id: Uuid::new_v4(),
            device_id: device_id.to_string(),
            role,
            expires_at: now + Duration::hours(ttl_hours as i64),
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(session.session_id, session.clone());
        session
    }

    pub async fn get(&self, session_id: &Uuid) -> Option<AuthSession> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .filter(|s| s.expires_at > Utc::now())
            .cloned()
    }

    /// Remove a session. Unknown ids are ignored.
    pub async fn remove(&self, session_id: &Uuid) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }
}
