//! Persistence client for books.

use std::sync::Arc;

use crate::error::StoreError;
use crate::models::book::{Book, BookId, BookInput, BookPatch, NewBook};
use crate::store::BookStore;

/// Validates book payloads, then delegates to a [`BookStore`].
///
/// Identifiers arrive already parsed as [`BookId`], and a batch is validated in
/// full before any of it is written.
#[derive(Clone)]
pub struct BookRepo {
    store: Arc<dyn BookStore>,
}

impl BookRepo {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn BookStore> {
        &self.store
    }

    pub async fn insert_one(&self, input: BookInput) -> Result<Book, StoreError> {
        let book = input.validate()?;
        let mut created = self.store.insert_many(vec![book]).await?;
        created
            .pop()
            .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("store returned no inserted book")))
    }

    /// All-or-nothing: the first invalid entry rejects the whole batch.
    pub async fn insert_many(&self, inputs: Vec<BookInput>) -> Result<Vec<Book>, StoreError> {
        let books = inputs
            .into_iter()
            .map(BookInput::validate)
            .collect::<Result<Vec<NewBook>, _>>()?;

        let count = books.len();
        let created = self.store.insert_many(books).await?;
        tracing::debug!(target: "bookshelf-db", count, "inserted book batch");
        Ok(created)
    }

    pub async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        self.store.find_all().await
    }

    pub async fn find_by_id(&self, id: BookId) -> Result<Book, StoreError> {
        self.store.find(&id).await?.ok_or(StoreError::NotFound(id))
    }

    pub async fn update_by_id(
        &self,
        id: BookId,
        patch: BookPatch,
    ) -> Result<Book, StoreError> {
        let changes = patch.validate()?;
        self.store
            .update(&id, &changes)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    pub async fn delete_by_id(&self, id: BookId) -> Result<(), StoreError> {
        if self.store.delete(&id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }

    /// Returns the number of removed books; succeeds on an empty collection.
    pub async fn delete_all(&self) -> Result<u64, StoreError> {
        self.store.delete_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBookStore;

    fn repo() -> BookRepo {
        BookRepo::new(Arc::new(MemoryBookStore::new()))
    }

    fn full(title: &str, author: &str, year: i32) -> BookInput {
        BookInput {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            published_year: Some(year),
        }
    }

    #[tokio::test]
    async fn insert_one_then_find_returns_same_fields() {
        let repo = repo();
        let created = repo
            .insert_one(full("1984", "George Orwell", 1949))
            .await
            .unwrap();

        let found = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.title, "1984");
        assert_eq!(found.author.as_deref(), Some("George Orwell"));
        assert_eq!(found.published_year, Some(1949));
    }

    #[tokio::test]
    async fn title_only_round_trip_has_no_optional_fields() {
        let repo = repo();
        let created = repo.insert_one(BookInput::titled("T")).await.unwrap();
        let found = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(found.author, None);
        assert_eq!(found.published_year, None);
    }

    #[tokio::test]
    async fn insert_one_without_title_fails_validation() {
        let err = repo().insert_one(BookInput::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn batch_with_one_invalid_entry_persists_nothing() {
        let repo = repo();
        repo.insert_one(BookInput::titled("Existing")).await.unwrap();

        let err = repo
            .insert_many(vec![
                BookInput::titled("Valid Book"),
                BookInput::titled("   "),
                BookInput::titled("Another Valid Book"),
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn batch_returns_books_in_input_order() {
        let repo = repo();
        let created = repo
            .insert_many(vec![BookInput::titled("Book 1"), BookInput::titled("Book 2")])
            .await
            .unwrap();
        let titles: Vec<_> = created.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Book 1", "Book 2"]);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let repo = repo();
        let id = BookId::generate();
        assert!(matches!(
            repo.find_by_id(id).await,
            Err(StoreError::NotFound(missing)) if missing == id
        ));
        assert!(matches!(
            repo.delete_by_id(id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let repo = repo();
        let created = repo.insert_one(full("Old", "A", 1999)).await.unwrap();

        let updated = repo
            .update_by_id(
                created.id,
                BookPatch {
                    title: Some("New Title".to_string()),
                    ..BookPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.author.as_deref(), Some("A"));
        assert_eq!(updated.published_year, Some(1999));
    }

    #[tokio::test]
    async fn delete_all_is_idempotent() {
        let repo = repo();
        assert_eq!(repo.delete_all().await.unwrap(), 0);
        repo.insert_one(BookInput::titled("T")).await.unwrap();
        assert_eq!(repo.delete_all().await.unwrap(), 1);
        assert_eq!(repo.delete_all().await.unwrap(), 0);
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
