use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::SessionStore;
use crate::config::{AppConfig, SecurityConfig};
use crate::database::Store;
use crate::handlers::{protected, public};
use crate::middleware::session_auth_middleware;
use crate::services::{ParticularsGenerator, ParticularsService, RegistrationService, StatusService};

/// Everything a handler can reach. Cheap to clone; all members are shared handles.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionStore,
    pub registration: RegistrationService,
    pub status: StatusService,
    pub particulars: ParticularsService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        generator: Arc<dyn ParticularsGenerator>,
        config: AppConfig,
    ) -> Self {
        Self {
            registration: RegistrationService::new(
                store.clone(),
                generator,
                config.registration.clone(),
                config.security.password_hash_cost,
            ),
            status: StatusService::new(store.clone()),
            particulars: ParticularsService::new(store.clone()),
            sessions: SessionStore::new(),
            store,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        .route("/health", get(health))
        // Pages
        .merge(page_routes())
        // Public API: device intake and login
        .merge(public_routes())
        // Session-gated read API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn page_routes() -> Router<AppState> {
    use public::pages;

    Router::new()
        .route("/", get(pages::dashboard))
        .route("/login_page", get(pages::login_page))
}

fn public_routes() -> Router<AppState> {
    use public::{auth, device};

    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/update_status", post(device::update_status))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{particulars, status};

    Router::new()
        .route("/get_latest_status", get(status::latest_status))
        .route("/get_history/:node_id", get(status::history))
        .route("/get_user_particulars/:node_id", get(particulars::user_particulars))
        .route("/get_caregiver_particulars/:node_id", get(particulars::caregiver_particulars))
        .route_layer(middleware::from_fn_with_state(state, session_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Explicit origins so the dashboard can send its session cookie cross-site
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
