use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::app::AppState;
use crate::middleware::resolve_session;
use crate::types::Role;

const LOGIN_TEMPLATE: &str = include_str!("../../../templates/login.html");
const DASHBOARD_TEMPLATE: &str = include_str!("../../../templates/dashboard.html");

/// GET /login_page
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_TEMPLATE)
}

/// GET / - dashboard for a logged-in user, otherwise back to the login page
pub async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match resolve_session(&state, &headers).await {
        Some(session) => Html(render_dashboard(session.role)).into_response(),
        None => Redirect::to("/login_page").into_response(),
    }
}

fn render_dashboard(role: Role) -> String {
    DASHBOARD_TEMPLATE.replace("{{ user_role }}", role.as_str())
}
