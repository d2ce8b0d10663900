#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

use carewatch_api::auth::password::hash_password;
use carewatch_api::config::{AppConfig, StoreBackend};
use carewatch_api::database::models::UserParticulars;
use carewatch_api::database::{MemoryStore, Store};
use carewatch_api::services::RandomGenerator;
use carewatch_api::{app, AppState};

pub const ADMIN_ID: &str = "admin";
pub const ADMIN_EMAIL: &str = "admin@carewatch.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

// bcrypt's minimum work factor keeps the suite fast
const TEST_HASH_COST: u32 = 4;

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve the router on an ephemeral port backed by a fresh in-memory store.
/// Each test gets its own server so state never leaks between tests.
pub async fn spawn_server() -> Result<TestServer> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("carewatch_api=debug"))
        .with_test_writer()
        .try_init();

    let store = Arc::new(MemoryStore::new());
    seed_admin(store.as_ref()).await?;

    let mut config = AppConfig::development();
    config.database.backend = StoreBackend::Memory;
    config.security.password_hash_cost = TEST_HASH_COST;

    let state = AppState::new(store.clone(), Arc::new(RandomGenerator::seeded(7)), config);
    let router = app(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        store,
        state,
    })
}

async fn seed_admin(store: &MemoryStore) -> Result<()> {
    let admin = UserParticulars {
        id: ADMIN_ID.to_string(),
        elderly_name: String::new(),
        elderly_address: String::new(),
        caregiver_name: "Administrator".to_string(),
        caregiver_phone: String::new(),
        caregiver_email: ADMIN_EMAIL.to_string(),
        password_hash: hash_password(ADMIN_PASSWORD, TEST_HASH_COST)?,
        role: "admin".to_string(),
    };
    store.insert_particulars_if_absent(&admin).await?;
    Ok(())
}

/// A browser-like client: keeps cookies, does not follow redirects
pub fn client() -> Result<Client> {
    Ok(Client::builder().cookie_store(true).redirect(Policy::none()).build()?)
}

pub async fn post_status(
    client: &Client,
    server: &TestServer,
    id: &str,
    status: &str,
) -> Result<Value> {
    let res = client
        .post(server.url("/update_status"))
        .json(&json!({ "id": id, "status": status }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "update_status returned {}", res.status());
    Ok(res.json().await?)
}

/// Report a new device, then issue its caregiver a password the way an operator
/// would. Returns the (email, password) pair.
pub async fn provision(client: &Client, server: &TestServer, id: &str) -> Result<(String, String)> {
    post_status(client, server, id, "OK").await?;

    let password = server
        .state
        .registration
        .reset_password(id)
        .await?
        .context("device was not provisioned")?;
    let email = server
        .store
        .find_particulars(id)
        .await?
        .context("no particulars after reset")?
        .caregiver_email;

    Ok((email, password))
}

pub async fn login(
    client: &Client,
    server: &TestServer,
    email: &str,
    password: &str,
) -> Result<Value> {
    let res = client
        .post(server.url("/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login returned {}", res.status());
    Ok(res.json().await?)
}

pub async fn login_admin(server: &TestServer) -> Result<Client> {
    let admin = client()?;
    login(&admin, server, ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    Ok(admin)
}
