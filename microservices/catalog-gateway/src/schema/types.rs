//! GraphQL entity types
//!
//! `author` and `books` are relation fields resolved by independent
//! re-queries, one per field, with no shared snapshot across a request.

use async_graphql::{ComplexObject, Context, Result, SimpleObject, ID};

use crate::domain::{AuthorRecord, BookRecord};
use crate::store::{AuthorStore, BookStore};

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Book {
    pub id: ID,
    pub title: String,
    pub genre: String,
    #[graphql(skip)]
    pub author_id: i32,
}

#[ComplexObject]
impl Book {
    /// The author this book references; null when the reference dangles.
    async fn author(&self, ctx: &Context<'_>) -> Result<Option<Author>> {
        let authors = ctx.data_unchecked::<AuthorStore>();
        Ok(authors.get(self.author_id).await?.map(Author::from))
    }
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self {
            id: ID::from(record.id.to_string()),
            title: record.title,
            genre: record.genre,
            author_id: record.author_id,
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Author {
    pub id: ID,
    pub name: String,
    #[graphql(skip)]
    pub record_id: i32,
}

#[ComplexObject]
impl Author {
    /// All books referencing this author.
    async fn books(&self, ctx: &Context<'_>) -> Result<Vec<Book>> {
        let books = ctx.data_unchecked::<BookStore>();
        Ok(books
            .list_by_author(self.record_id)
            .await?
            .into_iter()
            .map(Book::from)
            .collect())
    }
}

impl From<AuthorRecord> for Author {
    fn from(record: AuthorRecord) -> Self {
        Self {
            id: ID::from(record.id.to_string()),
            name: record.name,
            record_id: record.id,
        }
    }
}
