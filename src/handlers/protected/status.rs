use axum::{
    extract::{Extension, Path, State},
    response::Json,
};

use crate::app::AppState;
use crate::auth::AuthSession;
use crate::database::models::{LatestStatus, StatusEvent};
use crate::error::ApiError;

/// GET /get_latest_status - newest report per visible device
pub async fn latest_status(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Vec<LatestStatus>>, ApiError> {
    let rows = state.status.latest(&session).await?;
    Ok(Json(rows))
}

/// GET /get_history/:node_id - every report for one device, newest first
pub async fn history(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(node_id): Path<String>,
) -> Result<Json<Vec<StatusEvent>>, ApiError> {
    let rows = state.status.history(&session, &node_id).await?;
    Ok(Json(rows))
}
