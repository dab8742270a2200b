//! Book data access
//!
//! Every write uses `RETURNING`, so the caller always observes the stored
//! row (generated id included) or the failure. `author_id` is a weak
//! reference; nothing here checks that the author row exists.

use libris_db::{DbError, DbPool, Result};
use tracing::debug;

use crate::domain::BookRecord;

const BOOK_COLUMNS: &str = "id, title, genre, author_id";

#[derive(Clone)]
pub struct BookStore {
    pool: DbPool,
}

impl BookStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fetch a single book by primary key. `None` when no row matches.
    pub async fn get(&self, id: i32) -> Result<Option<BookRecord>> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"),
                &[&id],
            )
            .await
            .map_err(DbError::Query)?;
        row.as_ref().map(BookRecord::from_row).transpose()
    }

    /// Fetch all books, ordered by id.
    pub async fn list(&self) -> Result<Vec<BookRecord>> {
        let conn = self.pool.get().await?;
        let rows = conn
            .query(
                &format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"),
                &[],
            )
            .await
            .map_err(DbError::Query)?;
        rows.iter().map(BookRecord::from_row).collect()
    }

    /// Fetch all books referencing the given author, ordered by id.
    pub async fn list_by_author(&self, author_id: i32) -> Result<Vec<BookRecord>> {
        let conn = self.pool.get().await?;
        let rows = conn
            .query(
                &format!("SELECT {BOOK_COLUMNS} FROM books WHERE author_id = $1 ORDER BY id"),
                &[&author_id],
            )
            .await
            .map_err(DbError::Query)?;
        rows.iter().map(BookRecord::from_row).collect()
    }

    /// Insert a book and return the stored row.
    pub async fn insert(&self, title: &str, genre: &str, author_id: i32) -> Result<BookRecord> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_one(
                &format!(
                    "INSERT INTO books (title, genre, author_id) \
                     VALUES ($1, $2, $3) RETURNING {BOOK_COLUMNS}"
                ),
                &[&title, &genre, &author_id],
            )
            .await
            .map_err(DbError::Query)?;
        let book = BookRecord::from_row(&row)?;
        debug!(book_id = book.id, "inserted book");
        Ok(book)
    }

    /// Update all mutable fields of a book. `None` when no row matched.
    pub async fn update(
        &self,
        id: i32,
        title: &str,
        genre: &str,
        author_id: i32,
    ) -> Result<Option<BookRecord>> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                &format!(
                    "UPDATE books SET title = $1, genre = $2, author_id = $3 \
                     WHERE id = $4 RETURNING {BOOK_COLUMNS}"
                ),
                &[&title, &genre, &author_id, &id],
            )
            .await
            .map_err(DbError::Query)?;
        if row.is_some() {
            debug!(book_id = id, "updated book");
        }
        row.as_ref().map(BookRecord::from_row).transpose()
    }

    /// Delete a book by primary key, returning the deleted row, or `None`
    /// when the row did not exist.
    pub async fn delete(&self, id: i32) -> Result<Option<BookRecord>> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                &format!("DELETE FROM books WHERE id = $1 RETURNING {BOOK_COLUMNS}"),
                &[&id],
            )
            .await
            .map_err(DbError::Query)?;
        if row.is_some() {
            debug!(book_id = id, "deleted book");
        }
        row.as_ref().map(BookRecord::from_row).transpose()
    }
}
