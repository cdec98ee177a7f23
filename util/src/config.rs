//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables (and `.env`).
//! Tests can override individual fields through the per-field setters.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Secret used when `JWT_SECRET` is not provided. Refused in production by the server binary.
pub const DEFAULT_JWT_SECRET: &str = "sessional-dev-secret";

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    pub session_cookie_secure: bool,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Missing or malformed values fall back to development defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "sessional".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: flag("LOG_TO_STDOUT"),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/sessional.db".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.into()),
            jwt_duration_minutes: env::var("JWT_DURATION_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(60 * 24),
            session_cookie_secure: flag("SESSION_COOKIE_SECURE"),
        }
    }

    fn lock() -> &'static RwLock<AppConfig> {
        CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()))
    }

    /// Returns a snapshot of the global configuration.
    pub fn global() -> AppConfig {
        match Self::lock().read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        AppConfig::set_field(|cfg| *cfg = AppConfig::from_env());
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        match Self::lock().write() {
            Ok(mut guard) => setter(&mut guard),
            Err(poisoned) => setter(&mut poisoned.into_inner()),
        }
    }

    // --- Per-field setters below ---

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: impl Into<u64>) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value.into());
    }
}

// --- Free accessors ---

pub fn env() -> String {
    AppConfig::global().env
}

pub fn project_name() -> String {
    AppConfig::global().project_name
}

pub fn log_level() -> String {
    AppConfig::global().log_level
}

pub fn log_file() -> String {
    AppConfig::global().log_file
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path
}

pub fn host() -> String {
    AppConfig::global().host
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn session_cookie_secure() -> bool {
    AppConfig::global().session_cookie_secure
}
