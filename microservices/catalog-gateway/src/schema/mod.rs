//! GraphQL schema for the catalog
//!
//! Each root field composes one or more store calls; mutations that take
//! an author name resolve it through `AuthorStore::find_or_create`.
//! Storage errors propagate unchanged into the response `errors` array.

mod types;

pub use types::{Author, Book};

use async_graphql::{Context, EmptySubscription, Object, Result, Schema, ID};
use libris_db::DbPool;

use crate::store::{AuthorStore, BookStore};

pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the executable schema over the shared pool.
pub fn build_schema(pool: DbPool) -> CatalogSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(AuthorStore::new(pool.clone()))
        .data(BookStore::new(pool))
        .finish()
}

fn parse_id(id: &ID) -> Result<i32> {
    id.parse::<i32>()
        .map_err(|_| async_graphql::Error::new(format!("invalid id: {}", id.as_str())))
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Fetch a single book by primary key.
    async fn book(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Book>> {
        let books = ctx.data_unchecked::<BookStore>();
        Ok(books.get(parse_id(&id)?).await?.map(Book::from))
    }

    /// Fetch a single author by primary key.
    async fn author(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Author>> {
        let authors = ctx.data_unchecked::<AuthorStore>();
        Ok(authors.get(parse_id(&id)?).await?.map(Author::from))
    }

    /// Fetch all books.
    async fn books(&self, ctx: &Context<'_>) -> Result<Vec<Book>> {
        let books = ctx.data_unchecked::<BookStore>();
        Ok(books.list().await?.into_iter().map(Book::from).collect())
    }

    /// Fetch all authors.
    async fn authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let authors = ctx.data_unchecked::<AuthorStore>();
        Ok(authors.list().await?.into_iter().map(Author::from).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Insert a book, resolving the author by name and creating the
    /// author when absent.
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        genre: String,
        author: String,
    ) -> Result<Book> {
        let authors = ctx.data_unchecked::<AuthorStore>();
        let books = ctx.data_unchecked::<BookStore>();
        let author_id = authors.find_or_create(&author).await?;
        Ok(books.insert(&title, &genre, author_id).await?.into())
    }

    /// Insert an author and return the created row.
    async fn add_author(&self, ctx: &Context<'_>, name: String) -> Result<Author> {
        let authors = ctx.data_unchecked::<AuthorStore>();
        Ok(authors.insert(&name).await?.into())
    }

    /// Delete a book, returning the deleted row, or null when no row
    /// matched.
    async fn delete_book(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Book>> {
        let books = ctx.data_unchecked::<BookStore>();
        Ok(books.delete(parse_id(&id)?).await?.map(Book::from))
    }

    /// Update a book's title, genre, and author reference, with the same
    /// find-or-create author resolution as `addBook`.
    async fn update_book(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: String,
        genre: String,
        author: String,
    ) -> Result<Option<Book>> {
        let authors = ctx.data_unchecked::<AuthorStore>();
        let books = ctx.data_unchecked::<BookStore>();
        let author_id = authors.find_or_create(&author).await?;
        Ok(books
            .update(parse_id(&id)?, &title, &genre, author_id)
            .await?
            .map(Book::from))
    }
}
