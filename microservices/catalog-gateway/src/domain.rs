//! Catalog domain records
//!
//! Plain row images of the `books` and `authors` tables. Decoding is
//! fallible per column so a schema drift surfaces as a query error
//! instead of a panic.

use libris_db::{DbError, Row};

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorRecord {
    pub id: i32,
    pub name: String,
}

impl AuthorRecord {
    pub fn from_row(row: &Row) -> Result<Self, DbError> {
        Ok(Self {
            id: row.try_get("id").map_err(DbError::Query)?,
            name: row.try_get("name").map_err(DbError::Query)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub id: i32,
    pub title: String,
    pub genre: String,
    pub author_id: i32,
}

impl BookRecord {
    pub fn from_row(row: &Row) -> Result<Self, DbError> {
        Ok(Self {
            id: row.try_get("id").map_err(DbError::Query)?,
            title: row.try_get("title").map_err(DbError::Query)?,
            genre: row.try_get("genre").map_err(DbError::Query)?,
            author_id: row.try_get("author_id").map_err(DbError::Query)?,
        })
    }
}
