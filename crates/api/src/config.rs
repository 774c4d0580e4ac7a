//! Server configuration read from the environment (after `.env` is loaded).

use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Which persistence backend serves the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via `DATABASE_URL`.
    Postgres,
    /// Process-local store; data is lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "Unknown store backend '{other}' (expected 'postgres' or 'memory')"
            )),
        }
    }
}

/// Runtime settings for the HTTP server.
///
/// | Env var                 | Default                     |
/// |-------------------------|-----------------------------|
/// | `HOST`                  | `0.0.0.0`                   |
/// | `PORT`                  | `3000`                      |
/// | `CORS_ORIGINS`          | `http://localhost:5173`     |
/// | `REQUEST_TIMEOUT_SECS`  | `30`                        |
/// | `SHUTDOWN_TIMEOUT_SECS` | `30`                        |
/// | `STORE_BACKEND`         | `postgres`                  |
/// | `DATABASE_URL`          | required for postgres       |
///
/// JWT settings are documented on [`JwtConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// # Panics
    ///
    /// Panics on a value that does not parse, or when the postgres backend is
    /// selected without a `DATABASE_URL`.
    pub fn from_env() -> Self {
        let store_backend: StoreBackend = parse_var("STORE_BACKEND", "postgres");
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty());
        assert!(
            store_backend != StoreBackend::Postgres || database_url.is_some(),
            "DATABASE_URL must be set when STORE_BACKEND=postgres"
        );

        Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", "3000"),
            cors_origins: split_origins(&var_or("CORS_ORIGINS", "http://localhost:5173")),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", "30"),
            shutdown_timeout_secs: parse_var("SHUTDOWN_TIMEOUT_SECS", "30"),
            store_backend,
            database_url,
            jwt: JwtConfig::from_env(),
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: &str) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = var_or(name, default);
    raw.parse()
        .unwrap_or_else(|e| panic!("Invalid {name} '{raw}': {e}"))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
