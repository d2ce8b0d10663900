use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors surfaced by any store implementation
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

impl DatabaseError {
    /// Lift unique-constraint failures into `Conflict`, leave everything else alone
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unique constraint").to_string();
                return DatabaseError::Conflict(constraint);
            }
        }
        DatabaseError::Sqlx(err)
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS status_events (
        seq          BIGSERIAL PRIMARY KEY,
        device_id    TEXT NOT NULL,
        status       TEXT NOT NULL,
        "timestamp"  TEXT NOT NULL,
        recorded_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS status_events_device_recorded_idx
        ON status_events (device_id, recorded_at DESC, seq DESC)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_particulars (
        id                TEXT PRIMARY KEY,
        elderly_name      TEXT NOT NULL,
        elderly_address   TEXT NOT NULL,
        caregiver_name    TEXT NOT NULL,
        caregiver_phone   TEXT NOT NULL,
        caregiver_email   TEXT NOT NULL,
        password_hash     TEXT NOT NULL,
        role              TEXT NOT NULL
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS user_particulars_email_idx
        ON user_particulars (caregiver_email)
    "#,
];

/// Connection bootstrap for the Postgres-backed store
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool against `DATABASE_URL` using the configured limits
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let raw = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url.as_str())
            .await?;

        info!("Connected to database at {}", Self::redacted(&url));
        Ok(pool)
    }

    /// Create tables and indices if they are missing. Safe to run repeatedly.
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }

    /// Host/path only, for logs
    fn redacted(url: &url::Url) -> String {
        format!(
            "{}://{}{}",
            url.scheme(),
            url.host_str().unwrap_or("localhost"),
            url.path()
        )
    }
}
