//! Storage backends behind the [`BookStore`] seam.

mod memory;
mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_kernel::settings::DatabaseSettings;

use crate::error::StoreError;
use crate::models::book::{Book, BookChanges, BookId, NewBook};

pub use memory::MemoryBookStore;
pub use mongo::MongoBookStore;

/// Typed primitives over one book collection.
///
/// Inputs are already validated; implementations only report
/// [`StoreError::Backend`] failures. Absence is expressed through `Option` /
/// `bool` so the caller decides what "not found" means.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Short backend label for logs.
    fn backend(&self) -> &'static str;

    /// Persist every book and return them with their assigned ids, in input order.
    async fn insert_many(&self, books: Vec<NewBook>) -> Result<Vec<Book>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn find(&self, id: &BookId) -> Result<Option<Book>, StoreError>;

    /// Apply `changes` and return the post-update record.
    async fn update(&self, id: &BookId, changes: &BookChanges)
        -> Result<Option<Book>, StoreError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: &BookId) -> Result<bool, StoreError>;

    /// Returns the number of removed records.
    async fn delete_all(&self) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self) -> Result<(), StoreError>;
}

/// Open the backend selected by the connection string scheme.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn BookStore>> {
    let scheme = settings
        .uri
        .split_once("://")
        .map(|(scheme, _)| scheme)
        .unwrap_or_default();

    let store: Arc<dyn BookStore> = match scheme {
        "memory" => Arc::new(MemoryBookStore::new()),
        "mongodb" | "mongodb+srv" => Arc::new(MongoBookStore::connect(settings).await?),
        other => anyhow::bail!(
            "unsupported database scheme '{}' in {}",
            other,
            settings.redacted_uri()
        ),
    };

    tracing::info!(
        target: "bookshelf-db",
        backend = store.backend(),
        uri = %settings.redacted_uri(),
        "book store opened"
    );

    Ok(store)
}
