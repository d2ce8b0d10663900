use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Json, Redirect},
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::password::verify_password_blocking;
use crate::auth::{generate_token, validate_token, Claims};
use crate::error::ApiError;
use crate::middleware::{cleared_session_cookie, session_cookie, session_token};
use crate::types::Role;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub role: Role,
    pub id: String,
}

/// POST /login - Authenticate a caregiver or admin and open a session
///
/// Expected Input:
/// ```json
/// { "email": "john.lim7@gmail.com", "password": "P@ss1234" }
/// ```
///
/// Expected Output (Success), plus a `Set-Cookie` carrying the session:
/// ```json
/// { "message": "Login successful", "role": "caregiver", "id": "7" }
/// ```
///
/// Unknown email and wrong password produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ApiError::bad_request("email and password are required"));
    };

    let account = state.store.find_particulars_by_email(&email).await?;
    let verified = match &account {
        Some(a) => verify_password_blocking(password, a.password_hash.clone()).await,
        None => false,
    };
    let Some(account) = account.filter(|_| verified) else {
        tracing::warn!("Failed login attempt for {}", email);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };
    let Some(role) = account.role() else {
        tracing::warn!("Account {} has unrecognised role '{}'", account.id, account.role);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let security = &state.config.security;
    let session = state
        .sessions
        .create(&account.id, role, security.session_ttl_hours)
        .await;
    let token = generate_token(
        &Claims::new(session.session_id, security.session_ttl_hours),
        &security.session_secret,
    )?;

    tracing::info!("{} '{}' logged in", role, account.id);

    Ok((
        [(header::SET_COOKIE, session_cookie(&token, security))],
        Json(LoginResponse {
            message: "Login successful",
            role,
            id: account.id,
        }),
    ))
}

/// GET /logout - Drop the session (if any) and send the browser to the login page
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let security = &state.config.security;

    let claims = session_token(&headers)
        .and_then(|token| validate_token(&token, &security.session_secret).ok());
    if let Some(claims) = claims {
        if state.sessions.remove(&claims.sid).await {
            tracing::debug!("Session {} closed", claims.sid);
        }
    }

    (
        [(header::SET_COOKIE, cleared_session_cookie(security))],
        Redirect::to("/login_page"),
    )
}
