//! Data access for the catalog tables

mod authors;
mod books;

pub use authors::AuthorStore;
pub use books::BookStore;

#[cfg(test)]
mod tests {
    use super::*;
    use libris_db::DbPool;

    use crate::config::CatalogConfig;

    // These tests run real SQL and are skipped unless a catalog database
    // is reachable. Point DATABASE_HOST (plus the usual DATABASE_* vars)
    // at a database with schema.sql applied to enable them.
    fn test_pool() -> Option<DbPool> {
        std::env::var("DATABASE_HOST").ok()?;
        let config = CatalogConfig::from_env().ok()?;
        DbPool::new(config.pool_config()).ok()
    }

    async fn remove_author_by_name(pool: &DbPool, name: &str) {
        let conn = pool.get().await.unwrap();
        conn.execute(
            "DELETE FROM books WHERE author_id IN \
             (SELECT id FROM authors WHERE lower(name) = lower($1))",
            &[&name],
        )
        .await
        .unwrap();
        conn.execute(
            "DELETE FROM authors WHERE lower(name) = lower($1)",
            &[&name],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_get_missing_book_is_none() {
        let Some(pool) = test_pool() else { return };
        let books = BookStore::new(pool);
        assert_eq!(books.get(i32::MAX).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_or_create_reuses_case_insensitive_match() {
        let Some(pool) = test_pool() else { return };
        let authors = AuthorStore::new(pool.clone());
        let books = BookStore::new(pool.clone());
        let name = "J. Tolkien (find-or-create test)";
        remove_author_by_name(&pool, name).await;

        let created = authors.insert(name).await.unwrap();
        // Same name, different casing: the existing author must be reused.
        let reused = authors
            .find_or_create("j. tolkien (FIND-OR-CREATE TEST)")
            .await
            .unwrap();
        assert_eq!(reused, created.id);
        // Stored casing is the original insert's.
        let stored = authors.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, name);

        let book = books.insert("The Hobbit", "Fantasy", reused).await.unwrap();
        assert_eq!(book.author_id, created.id);
        assert_eq!(book.title, "The Hobbit");

        remove_author_by_name(&pool, name).await;
    }

    #[tokio::test]
    async fn test_find_or_create_creates_when_absent() {
        let Some(pool) = test_pool() else { return };
        let authors = AuthorStore::new(pool.clone());
        let name = "U. Le Guin (create test)";
        remove_author_by_name(&pool, name).await;

        assert_eq!(authors.find_id_by_name(name).await.unwrap(), None);
        let id = authors.find_or_create(name).await.unwrap();
        assert_eq!(authors.find_id_by_name(name).await.unwrap(), Some(id));
        // A second call resolves the same row instead of inserting again.
        assert_eq!(authors.find_or_create(name).await.unwrap(), id);

        remove_author_by_name(&pool, name).await;
    }

    #[tokio::test]
    async fn test_concurrent_find_or_create_yields_one_row() {
        let Some(pool) = test_pool() else { return };
        let name = "T. Pratchett (race test)";
        remove_author_by_name(&pool, name).await;

        let a = AuthorStore::new(pool.clone());
        let b = AuthorStore::new(pool.clone());
        let (left, right) = tokio::join!(a.find_or_create(name), b.find_or_create(name));
        assert_eq!(left.unwrap(), right.unwrap());

        let conn = pool.get().await.unwrap();
        let rows = conn
            .query(
                "SELECT id FROM authors WHERE lower(name) = lower($1)",
                &[&name],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        drop(conn);

        remove_author_by_name(&pool, name).await;
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let Some(pool) = test_pool() else { return };
        let authors = AuthorStore::new(pool.clone());
        let books = BookStore::new(pool.clone());
        let name = "F. Herbert (delete test)";
        remove_author_by_name(&pool, name).await;

        let author_id = authors.find_or_create(name).await.unwrap();
        let book = books.insert("Dune", "Sci-Fi", author_id).await.unwrap();

        let deleted = books.delete(book.id).await.unwrap().unwrap();
        assert_eq!(deleted, book);
        assert_eq!(books.get(book.id).await.unwrap(), None);
        // Deleting an absent row reports the absence, not an error.
        assert_eq!(books.delete(book.id).await.unwrap(), None);

        remove_author_by_name(&pool, name).await;
    }

    #[tokio::test]
    async fn test_update_is_reflected_by_get() {
        let Some(pool) = test_pool() else { return };
        let authors = AuthorStore::new(pool.clone());
        let books = BookStore::new(pool.clone());
        let name = "I. Asimov (update test)";
        remove_author_by_name(&pool, name).await;

        let author_id = authors.find_or_create(name).await.unwrap();
        let book = books.insert("Foundation", "Sci-Fi", author_id).await.unwrap();

        let updated = books
            .update(book.id, "Foundation and Empire", "Sci-Fi", author_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Foundation and Empire");
        assert_eq!(books.get(book.id).await.unwrap(), Some(updated));
        // Updating an absent row yields no row.
        assert_eq!(
            books
                .update(i32::MAX, "x", "y", author_id)
                .await
                .unwrap(),
            None
        );

        remove_author_by_name(&pool, name).await;
    }

    #[tokio::test]
    async fn test_listings_are_idempotent_without_mutations() {
        let Some(pool) = test_pool() else { return };
        let authors = AuthorStore::new(pool.clone());
        let books = BookStore::new(pool);

        assert_eq!(authors.list().await.unwrap(), authors.list().await.unwrap());
        assert_eq!(books.list().await.unwrap(), books.list().await.unwrap());
    }
}
