use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bookshelf_kernel::settings::DatabaseSettings;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use super::BookStore;
use crate::error::StoreError;
use crate::models::book::{Book, BookChanges, BookId, NewBook};

const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Book collection in a MongoDB database.
pub struct MongoBookStore {
    client: Client,
    database: Database,
    collection: Collection<BookDocument>,
}

impl MongoBookStore {
    pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .with_context(|| format!("invalid connection string {}", settings.redacted_uri()))?;
        options.app_name = Some("bookshelf".to_string());
        if options.server_selection_timeout.is_none() {
            options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        }

        let database_name = options
            .default_database
            .clone()
            .unwrap_or_else(|| settings.name.clone());

        let client = Client::with_options(options).context("failed to create MongoDB client")?;
        let database = client.database(&database_name);
        tracing::debug!(
            target: "bookshelf-db",
            database = %database_name,
            collection = %settings.collection,
            "mongodb collection selected"
        );
        let collection = database.collection::<BookDocument>(&settings.collection);

        Ok(Self {
            client,
            database,
            collection,
        })
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn insert_many(&self, books: Vec<NewBook>) -> Result<Vec<Book>, StoreError> {
        if books.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<BookDocument> = books
            .into_iter()
            .map(|book| BookDocument::from(book.into_book(BookId::generate())))
            .collect();

        self.collection
            .insert_many(&documents)
            .await
            .context("failed to insert books")?;

        Ok(documents.into_iter().map(Book::from).collect())
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .context("failed to query books")?;

        let documents: Vec<BookDocument> = cursor
            .try_collect()
            .await
            .context("failed to read books")?;

        Ok(documents.into_iter().map(Book::from).collect())
    }

    async fn find(&self, id: &BookId) -> Result<Option<Book>, StoreError> {
        let found = self
            .collection
            .find_one(by_id(id))
            .await
            .with_context(|| format!("failed to load book {id}"))?;

        Ok(found.map(Book::from))
    }

    async fn update(
        &self,
        id: &BookId,
        changes: &BookChanges,
    ) -> Result<Option<Book>, StoreError> {
        // `$set: {}` is rejected by the server.
        if changes.is_empty() {
            return self.find(id).await;
        }

        let updated = self
            .collection
            .find_one_and_update(by_id(id), doc! { "$set": set_fields(changes) })
            .return_document(ReturnDocument::After)
            .await
            .with_context(|| format!("failed to update book {id}"))?;

        Ok(updated.map(Book::from))
    }

    async fn delete(&self, id: &BookId) -> Result<bool, StoreError> {
        let result = self
            .collection
            .delete_one(by_id(id))
            .await
            .with_context(|| format!("failed to delete book {id}"))?;

        Ok(result.deleted_count > 0)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = self
            .collection
            .delete_many(doc! {})
            .await
            .context("failed to delete books")?;

        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}

fn by_id(id: &BookId) -> Document {
    doc! { "_id": id.object_id() }
}

fn set_fields(changes: &BookChanges) -> Document {
    let mut set = Document::new();
    if let Some(title) = &changes.title {
        set.insert("title", title.as_str());
    }
    if let Some(author) = &changes.author {
        set.insert("author", author.as_str());
    }
    if let Some(year) = changes.published_year {
        set.insert("publishedYear", year);
    }
    set
}

/// Stored shape of a book. Absent optional fields are left out of the
/// document instead of being written as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(
        rename = "publishedYear",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_year"
    )]
    published_year: Option<i32>,
}

impl From<Book> for BookDocument {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.object_id(),
            title: book.title,
            author: book.author,
            published_year: book.published_year,
        }
    }
}

impl From<BookDocument> for Book {
    fn from(document: BookDocument) -> Self {
        Self {
            id: BookId::from(document.id),
            title: document.title,
            author: document.author,
            published_year: document.published_year,
        }
    }
}

/// Shell-seeded documents carry years as doubles; accept any integral number.
fn deserialize_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    match Option::<Bson>::deserialize(deserializer)? {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::Int32(year)) => Ok(Some(year)),
        Some(Bson::Int64(year)) => i32::try_from(year).map(Some).map_err(D::Error::custom),
        Some(Bson::Double(year))
            if year.fract() == 0.0 && year >= f64::from(i32::MIN) && year <= f64::from(i32::MAX) =>
        {
            Ok(Some(year as i32))
        }
        Some(other) => Err(D::Error::custom(format!(
            "publishedYear must be an integer, found {other}"
        ))),
    }
}
