use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub cors_origin: Option<String>,
    pub low_stock_threshold: i32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_ttl_hours = env::var("JWT_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(24);
        let cors_origin = env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty());
        let low_stock_threshold = env::var("LOW_STOCK_THRESHOLD")
            .ok()
            .and_then(|t| t.parse::<i32>().ok())
            .unwrap_or(10);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            jwt_ttl_hours,
            cors_origin,
            low_stock_threshold,
        })
    }

    /// Config for tests and tools that only need a database URL and a signing key.
    pub fn for_database(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: jwt_secret.into(),
            jwt_ttl_hours: 24,
            cors_origin: None,
            low_stock_threshold: 10,
        }
    }
}
