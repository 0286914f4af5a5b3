//! Document store access for the book catalog.
//!
//! - [`models`]: the book record, its identifier and the validated input shapes
//! - [`store`]: the [`BookStore`] seam with MongoDB and in-memory backends
//! - [`repo`]: [`BookRepo`], the persistence client the HTTP layer talks to
//! - [`module`]: [`DatabaseModule`], which ties the store into the kernel lifecycle

pub mod error;
pub mod models;
pub mod module;
pub mod repo;
pub mod store;

pub use error::{StoreError, ValidationError};
pub use models::book::{Book, BookChanges, BookId, BookInput, BookPatch, NewBook};
pub use module::DatabaseModule;
pub use repo::BookRepo;
pub use store::{connect, BookStore, MemoryBookStore, MongoBookStore};
