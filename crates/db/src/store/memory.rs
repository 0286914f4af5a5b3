use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookStore;
use crate::error::StoreError;
use crate::models::book::{Book, BookChanges, BookId, NewBook};

/// In-process store that keeps books in insertion order.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert_many(&self, books: Vec<NewBook>) -> Result<Vec<Book>, StoreError> {
        let created: Vec<Book> = books
            .into_iter()
            .map(|book| book.into_book(BookId::generate()))
            .collect();

        self.books.write().await.extend(created.iter().cloned());
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.books.read().await.clone())
    }

    async fn find(&self, id: &BookId) -> Result<Option<Book>, StoreError> {
        Ok(self.books.read().await.iter().find(|b| &b.id == id).cloned())
    }

    async fn update(
        &self,
        id: &BookId,
        changes: &BookChanges,
    ) -> Result<Option<Book>, StoreError> {
        let mut books = self.books.write().await;
        Ok(books.iter_mut().find(|b| &b.id == id).map(|book| {
            book.apply(changes);
            book.clone()
        }))
    }

    async fn delete(&self, id: &BookId) -> Result<bool, StoreError> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|b| &b.id != id);
        Ok(books.len() != before)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut books = self.books.write().await;
        let removed = books.len() as u64;
        books.clear();
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::BookInput;

    fn new_book(title: &str) -> NewBook {
        BookInput::titled(title).validate().unwrap()
    }

    #[tokio::test]
    async fn insert_preserves_order_and_assigns_ids() {
        let store = MemoryBookStore::new();
        let created = store
            .insert_many(vec![new_book("Book 1"), new_book("Book 2")])
            .await
            .unwrap();

        assert_ne!(created[0].id, created[1].id);
        let all = store.find_all().await.unwrap();
        assert_eq!(all, created);
    }

    #[tokio::test]
    async fn update_missing_record_returns_none() {
        let store = MemoryBookStore::new();
        let changes = BookChanges {
            title: Some("x".to_string()),
            ..BookChanges::default()
        };
        assert!(store
            .update(&BookId::generate(), &changes)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = MemoryBookStore::new();
        let created = store.insert_many(vec![new_book("Gone")]).await.unwrap();

        assert!(store.delete(&created[0].id).await.unwrap());
        assert!(!store.delete(&created[0].id).await.unwrap());
        assert!(store.find(&created[0].id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_all_on_empty_store_is_a_no_op() {
        let store = MemoryBookStore::new();
        assert_eq!(store.delete_all().await.unwrap(), 0);
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
