use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

use crate::auth::password::DEFAULT_COST;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub registration: RegistrationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub cookie_secure: bool,
    #[serde(skip_serializing)]
    pub session_secret: String,
    pub session_ttl_hours: u64,
    /// bcrypt work factor for stored passwords
    pub password_hash_cost: u32,
}

/// Values baked into synthesized particulars and status timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    pub utc_offset_hours: i32,
    pub residence_block: String,
    pub residence_postal: String,
    pub email_domain: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("CAREWATCH_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("STORE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "memory" | "mem" => StoreBackend::Memory,
                _ => StoreBackend::Postgres,
            };
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_COOKIE_SECURE") {
            self.security.cookie_secure = v.parse().unwrap_or(self.security.cookie_secure);
        }
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SESSION_TTL_HOURS") {
            self.security.session_ttl_hours = v.parse().unwrap_or(self.security.session_ttl_hours);
        }
        if let Ok(v) = env::var("PASSWORD_HASH_COST") {
            self.security.password_hash_cost = v.parse().unwrap_or(self.security.password_hash_cost);
        }

        // Registration overrides
        if let Ok(v) = env::var("DISPLAY_UTC_OFFSET_HOURS") {
            self.registration.utc_offset_hours = v.parse().unwrap_or(self.registration.utc_offset_hours);
        }
        if let Ok(v) = env::var("RESIDENCE_BLOCK") {
            self.registration.residence_block = v;
        }
        if let Ok(v) = env::var("RESIDENCE_POSTAL") {
            self.registration.residence_postal = v;
        }
        if let Ok(v) = env::var("CAREGIVER_EMAIL_DOMAIN") {
            self.registration.email_domain = v;
        }

        self
    }

    /// Reject combinations the server cannot start with
    pub fn validate(&self) -> Result<(), String> {
        if self.security.session_secret.trim().is_empty() {
            return Err("SESSION_SECRET must be set".to_string());
        }
        if self.database.backend == StoreBackend::Postgres && self.database.url.is_none() {
            return Err("DATABASE_URL must be set when STORE_BACKEND=postgres".to_string());
        }
        if !(4..=31).contains(&self.security.password_hash_cost) {
            return Err(format!(
                "PASSWORD_HASH_COST must be between 4 and 31, got {}",
                self.security.password_hash_cost
            ));
        }
        if !(-12..=14).contains(&self.registration.utc_offset_hours) {
            return Err(format!(
                "DISPLAY_UTC_OFFSET_HOURS out of range: {}",
                self.registration.utc_offset_hours
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![],
                cookie_secure: false,
                session_secret: "carewatch-dev-session-secret".to_string(),
                session_ttl_hours: 24 * 7, // 1 week
                password_hash_cost: 10,
            },
            registration: RegistrationConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                cookie_secure: true,
                session_secret: String::new(),
                session_ttl_hours: 24,
                password_hash_cost: DEFAULT_COST,
            },
            registration: RegistrationConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                cookie_secure: true,
                session_secret: String::new(),
                session_ttl_hours: 12,
                password_hash_cost: DEFAULT_COST,
            },
            registration: RegistrationConfig::default(),
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 8, // Asia/Singapore, no DST
            residence_block: "570".to_string(),
            residence_postal: "560570".to_string(),
            email_domain: "gmail.com".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
