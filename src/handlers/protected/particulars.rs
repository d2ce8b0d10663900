use axum::{
    extract::{Extension, Path, State},
    response::Json,
};

use crate::app::AppState;
use crate::auth::AuthSession;
use crate::error::ApiError;
use crate::services::{CaregiverContact, ParticularsView};

/// GET /get_user_particulars/:node_id
///
/// Admins get the whole record (minus credentials); a caregiver gets only the
/// resident's id, name and address for their own device.
pub async fn user_particulars(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(node_id): Path<String>,
) -> Result<Json<ParticularsView>, ApiError> {
    let view = state.particulars.user_particulars(&session, &node_id).await?;
    Ok(Json(view))
}

/// GET /get_caregiver_particulars/:node_id - caregiver contact, email for admins only
pub async fn caregiver_particulars(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(node_id): Path<String>,
) -> Result<Json<CaregiverContact>, ApiError> {
    let contact = state.particulars.caregiver_particulars(&session, &node_id).await?;
    Ok(Json(contact))
}
