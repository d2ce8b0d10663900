use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{validate_token, AuthSession};
use crate::config::SecurityConfig;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "carewatch_session";

/// Session middleware for the read API. Resolves the cookie to a live session
/// and injects it as an `AuthSession` extension.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = resolve_session(&state, request.headers())
        .await
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Cookie → signed token → server-side session. Any failed step means no session.
pub async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Option<AuthSession> {
    let token = session_token(headers)?;

    let claims = match validate_token(&token, &state.config.security.session_secret) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Rejected session cookie: {}", e);
            return None;
        }
    };

    let session = state.sessions.get(&claims.sid).await;
    if session.is_none() {
        tracing::debug!("Session {} not found or expired", claims.sid);
    }
    session
}

/// Extract the session token from the Cookie header(s)
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: &str, security: &SecurityConfig) -> String {
    let max_age = security.session_ttl_hours * 3600;
    with_flags(format!("{}={}; Max-Age={}", SESSION_COOKIE, token, max_age), security)
}

pub fn cleared_session_cookie(security: &SecurityConfig) -> String {
    with_flags(format!("{}=; Max-Age=0", SESSION_COOKIE), security)
}

fn with_flags(cookie: String, security: &SecurityConfig) -> String {
    let mut cookie = format!("{}; Path=/; HttpOnly; SameSite=Lax", cookie);
    if security.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}
