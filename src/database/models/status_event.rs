use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Wall-clock format shown to dashboard users, e.g. `14:03:27 05/03/25`
pub const DISPLAY_FORMAT: &str = "%H:%M:%S %d/%m/%y";

/// One status report from a device. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct StatusEvent {
    #[serde(rename = "id")]
    pub device_id: String,
    pub status: String,
    pub timestamp: String,
    /// Ordering key; the formatted `timestamp` does not sort chronologically
    #[serde(skip)]
    pub recorded_at: DateTime<Utc>,
}

impl StatusEvent {
    pub fn new(
        device_id: impl Into<String>,
        status: impl Into<String>,
        recorded_at: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            status: status.into(),
            timestamp: recorded_at.with_timezone(&offset).format(DISPLAY_FORMAT).to_string(),
            recorded_at,
        }
    }
}

/// Latest event per device, shaped the way the dashboard consumes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct LatestStatus {
    #[serde(rename = "_id")]
    pub device_id: String,
    pub latest_status: String,
    pub timestamp: String,
}

impl From<&StatusEvent> for LatestStatus {
    fn from(event: &StatusEvent) -> Self {
        Self {
            device_id: event.device_id.clone(),
            latest_status: event.status.clone(),
            timestamp: event.timestamp.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_timestamp_in_display_offset() {
        let sgt = FixedOffset::east_opt(8 * 3600).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 20, 3, 27).unwrap();
        let event = StatusEvent::new("dev1", "OK", at, sgt);
        // 20:03 UTC is 04:03 the next day in +08:00
        assert_eq!(event.timestamp, "04:03:27 05/03/25");
    }

    #[test]
    fn serializes_without_ordering_key() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let event = StatusEvent::new("dev1", "FALL", at, FixedOffset::east_opt(0).unwrap());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, serde_json::json!({
            "id": "dev1",
            "status": "FALL",
            "timestamp": "00:00:00 01/01/25"
        }));
    }
}
