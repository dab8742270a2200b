//! Author data access
//!
//! One method per SQL statement. Name lookup is case-insensitive
//! (`lower(name)`); inserts store the caller's original casing. The
//! unique index on `lower(name)` makes `find_or_create` race-safe.

use libris_db::{DbError, DbPool, Result};
use tracing::debug;

use crate::domain::AuthorRecord;

#[derive(Clone)]
pub struct AuthorStore {
    pool: DbPool,
}

impl AuthorStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Case-insensitive id lookup by name. Absence is `None`, not an error.
    pub async fn find_id_by_name(&self, name: &str) -> Result<Option<i32>> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                "SELECT id FROM authors WHERE lower(name) = lower($1)",
                &[&name],
            )
            .await
            .map_err(DbError::Query)?;
        row.map(|r| r.try_get("id").map_err(DbError::Query))
            .transpose()
    }

    /// Fetch a single author by primary key. `None` when no row matches.
    pub async fn get(&self, id: i32) -> Result<Option<AuthorRecord>> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt("SELECT id, name FROM authors WHERE id = $1", &[&id])
            .await
            .map_err(DbError::Query)?;
        row.as_ref().map(AuthorRecord::from_row).transpose()
    }

    /// Fetch all authors, ordered by id.
    pub async fn list(&self) -> Result<Vec<AuthorRecord>> {
        let conn = self.pool.get().await?;
        let rows = conn
            .query("SELECT id, name FROM authors ORDER BY id", &[])
            .await
            .map_err(DbError::Query)?;
        rows.iter().map(AuthorRecord::from_row).collect()
    }

    /// Insert an author and return the stored row. A name that collides
    /// case-insensitively with an existing author is a storage error.
    pub async fn insert(&self, name: &str) -> Result<AuthorRecord> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_one(
                "INSERT INTO authors (name) VALUES ($1) RETURNING id, name",
                &[&name],
            )
            .await
            .map_err(DbError::Query)?;
        let author = AuthorRecord::from_row(&row)?;
        debug!(author_id = author.id, "inserted author");
        Ok(author)
    }

    /// Resolve an author id by name, creating the author when absent.
    ///
    /// The conditional insert returns no row when a concurrent caller won
    /// the race; the follow-up lookup then sees the winner's row, so the
    /// stored casing is whichever insert landed first.
    pub async fn find_or_create(&self, name: &str) -> Result<i32> {
        if let Some(id) = self.find_id_by_name(name).await? {
            return Ok(id);
        }

        let conn = self.pool.get().await?;
        let inserted = conn
            .query_opt(
                "INSERT INTO authors (name) VALUES ($1) \
                 ON CONFLICT ((lower(name))) DO NOTHING RETURNING id",
                &[&name],
            )
            .await
            .map_err(DbError::Query)?;
        drop(conn);

        match inserted {
            Some(row) => {
                let id = row.try_get("id").map_err(DbError::Query)?;
                debug!(author_id = id, "created author");
                Ok(id)
            }
            None => self
                .find_id_by_name(name)
                .await?
                .ok_or(DbError::NotFound),
        }
    }
}
