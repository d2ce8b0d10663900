use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;

/// Devices send `id` and `status`; both may arrive as strings or scalars
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: Option<Value>,
    pub status: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub message: &'static str,
    pub id: String,
    pub timestamp: String,
}

/// POST /update_status - Record a device report
///
/// Any device-supplied timestamp is ignored; the server stamps receipt time.
/// The first report from an unseen id also provisions its particulars. The
/// generated login is never echoed back; operators issue one with
/// `carewatch particulars reset-password`.
pub async fn update_status(
    State(state): State<AppState>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("Invalid data format"))?;

    let (Some(device_id), Some(status)) = (device_id_text(payload.id), status_text(payload.status))
    else {
        return Err(ApiError::bad_request("Invalid data format"));
    };

    let receipt = state.registration.record_status(&device_id, &status).await?;

    Ok(Json(UpdateStatusResponse {
        message: "Status updated",
        id: receipt.device_id,
        timestamp: receipt.timestamp,
    }))
}

/// Ids are stored exactly as sent; only blank strings are refused
fn device_id_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Status is opaque: strings pass through, other JSON is stored as its text form
fn status_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_ids_accept_strings_and_numbers() {
        assert_eq!(device_id_text(Some(json!("dev1"))), Some("dev1".to_string()));
        assert_eq!(device_id_text(Some(json!(7))), Some("7".to_string()));
        assert_eq!(device_id_text(Some(json!(" dev1 "))), Some(" dev1 ".to_string()));
        assert_eq!(device_id_text(Some(json!("  "))), None);
        assert_eq!(device_id_text(Some(json!(null))), None);
        assert_eq!(device_id_text(Some(json!({"a": 1}))), None);
        assert_eq!(device_id_text(None), None);
    }

    #[test]
    fn status_is_kept_verbatim() {
        assert_eq!(status_text(Some(json!("OK"))), Some("OK".to_string()));
        assert_eq!(status_text(Some(json!(""))), Some(String::new()));
        assert_eq!(status_text(Some(json!(true))), Some("true".to_string()));
        assert_eq!(status_text(Some(json!(null))), None);
    }
}
