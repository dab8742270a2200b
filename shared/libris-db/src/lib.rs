//! Libris Database Client
//!
//! Pooled access to the relational catalog store over the PostgreSQL
//! wire protocol. Every statement issued through a pooled connection is
//! parameterized and autocommitted; no explicit transactions are opened.

mod error;
mod pool;

pub use error::{DbError, Result};
pub use pool::{DbPool, PoolConfig, PoolStats};

/// Re-export tokio-postgres types for convenience
pub use tokio_postgres::{types::ToSql, Row};
