use anyhow::Result;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown MATCH_STORE '{}' (expected postgres or memory)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub jwt_secret: String,
    pub store_timeout: Duration,
    pub store_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, falling back to the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_SERVER_PORT),
            store_backend: env::var("MATCH_STORE")
                .unwrap_or_else(|_| "postgres".to_string())
                .parse()?,
            jwt_secret,
            store_timeout: Duration::from_millis(
                env::var("STORE_TIMEOUT_MS")
                    .unwrap_or_else(|_| DEFAULT_STORE_TIMEOUT_MS.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_STORE_TIMEOUT_MS),
            ),
            store_retries: env::var("STORE_RETRIES")
                .unwrap_or_else(|_| DEFAULT_STORE_RETRIES.to_string())
                .parse()
                .unwrap_or(DEFAULT_STORE_RETRIES),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            store_backend: StoreBackend::Memory,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            store_retries: DEFAULT_STORE_RETRIES,
        }
    }
}
