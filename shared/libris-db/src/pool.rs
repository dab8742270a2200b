//! Connection pool for the catalog store

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;
use tracing::{debug, info};

use crate::{DbError, Result};

/// Pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub max_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "libris".to_string(),
            password: "password".to_string(),
            dbname: "libris".to_string(),
            max_size: 32,
        }
    }
}

impl PoolConfig {
    fn pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.dbname);
        config
    }
}

/// Bounded pool of connections to the catalog store.
///
/// Construction is lazy: no connection is opened until `get()`. Callers
/// queue when all `max_size` connections are checked out.
#[derive(Clone)]
pub struct DbPool {
    pool: Pool,
}

impl DbPool {
    /// Create a new connection pool
    pub fn new(config: PoolConfig) -> Result<Self> {
        info!(
            host = %config.host,
            dbname = %config.dbname,
            max_size = config.max_size,
            "Creating database connection pool"
        );

        if config.max_size == 0 {
            return Err(DbError::Configuration(
                "pool max_size must be at least 1".to_string(),
            ));
        }

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = Manager::from_config(config.pg_config(), NoTls, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.max_size)
            .build()
            .map_err(|e| DbError::Pool(e.to_string()))?;

        debug!("Database pool created successfully");

        Ok(Self { pool })
    }

    /// Get a connection from the pool
    pub async fn get(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| DbError::Pool(e.to_string()))
    }

    /// Check pool health
    pub async fn is_healthy(&self) -> bool {
        match self.pool.get().await {
            Ok(conn) => conn.simple_query("SELECT 1").await.is_ok(),
            Err(_) => false,
        }
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        let status = self.pool.status();
        PoolStats {
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }
}

/// Pool statistics
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: usize,
    pub available: usize,
    pub waiting: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_default() {
        let config = PoolConfig::default();
        assert_eq!(config.port, 5432);
        assert_eq!(config.max_size, 32);
    }

    #[test]
    fn test_zero_sized_pool_rejected() {
        let config = PoolConfig {
            max_size: 0,
            ..PoolConfig::default()
        };
        assert!(DbPool::new(config).is_err());
    }

    #[test]
    fn test_pool_creation_is_lazy() {
        // Building a pool never dials the server; stats start empty.
        let pool = DbPool::new(PoolConfig::default()).unwrap();
        let stats = pool.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.available, 0);
    }

    #[tokio::test]
    async fn test_pool_health_check() {
        // Requires a running catalog database. Skip when not configured.
        let Ok(host) = std::env::var("DATABASE_HOST") else {
            return;
        };
        let config = PoolConfig {
            host,
            user: std::env::var("DATABASE_USER").unwrap_or_else(|_| "libris".to_string()),
            password: std::env::var("DATABASE_PASSWORD")
                .unwrap_or_else(|_| "password".to_string()),
            dbname: std::env::var("DATABASE_NAME").unwrap_or_else(|_| "libris".to_string()),
            ..PoolConfig::default()
        };
        let pool = DbPool::new(config).unwrap();
        assert!(pool.is_healthy().await);
    }
}
