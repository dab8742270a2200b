//! Catalog Gateway Configuration

use libris_core::{LibrisError, Result};
use libris_db::PoolConfig;

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub http_bind: String,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_pool_size: usize,
    pub cors_domain: String,
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_bind: std::env::var("HTTP_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            db_host: std::env::var("DATABASE_HOST").unwrap_or_else(|_| "localhost".to_string()),
            db_port: std::env::var("DATABASE_PORT")
                .unwrap_or_else(|_| "5432".to_string())
                .parse()
                .map_err(|e| LibrisError::Config(format!("Invalid DATABASE_PORT: {}", e)))?,
            db_user: std::env::var("DATABASE_USER").unwrap_or_else(|_| "libris".to_string()),
            db_password: std::env::var("DATABASE_PASSWORD")
                .unwrap_or_else(|_| "password".to_string()),
            db_name: std::env::var("DATABASE_NAME").unwrap_or_else(|_| "libris".to_string()),
            db_pool_size: std::env::var("DATABASE_POOL_SIZE")
                .unwrap_or_else(|_| "32".to_string())
                .parse()
                .map_err(|e| LibrisError::Config(format!("Invalid DATABASE_POOL_SIZE: {}", e)))?,
            cors_domain: std::env::var("CORS_DOMAIN").unwrap_or_else(|_| "*".to_string()),
        })
    }

    /// Connection-pool settings for the configured catalog database.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            dbname: self.db_name.clone(),
            max_size: self.db_pool_size,
        }
    }
}
