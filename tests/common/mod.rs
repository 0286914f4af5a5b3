#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use bookshelf_db::{Book, BookChanges, BookId, BookStore, MemoryBookStore, NewBook, StoreError};
use bookshelf_kernel::settings::Settings;

/// Build the full application router, with every middleware layer the
/// binary uses, over the given store.
pub fn build_test_app(store: Arc<dyn BookStore>) -> Router {
    let registry = bookshelf::build_registry(store);
    bookshelf_http::build_router(&registry, &Settings::default())
}

/// Router over a fresh in-memory store.
pub fn memory_app() -> Router {
    build_test_app(Arc::new(MemoryBookStore::new()))
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router should not fail")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_raw(app, Method::POST, uri, body.to_string()).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_raw(app, Method::PUT, uri, body.to_string()).await
}

/// Send `body` verbatim with a JSON content type.
pub async fn send_raw(app: Router, method: Method, uri: &str, body: String) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Wraps a store and counts every data call that reaches it.
pub struct CountingStore {
    inner: MemoryBookStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryBookStore::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookStore for CountingStore {
    fn backend(&self) -> &'static str {
        "counting"
    }

    async fn insert_many(&self, books: Vec<NewBook>) -> Result<Vec<Book>, StoreError> {
        self.hit();
        self.inner.insert_many(books).await
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        self.hit();
        self.inner.find_all().await
    }

    async fn find(&self, id: &BookId) -> Result<Option<Book>, StoreError> {
        self.hit();
        self.inner.find(id).await
    }

    async fn update(
        &self,
        id: &BookId,
        changes: &BookChanges,
    ) -> Result<Option<Book>, StoreError> {
        self.hit();
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: &BookId) -> Result<bool, StoreError> {
        self.hit();
        self.inner.delete(id).await
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        self.hit();
        self.inner.delete_all().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A store whose every data operation fails as an unreachable backend would.
pub struct FailingStore;

fn unreachable_backend() -> StoreError {
    StoreError::Backend(anyhow::anyhow!("connection refused"))
}

#[async_trait]
impl BookStore for FailingStore {
    fn backend(&self) -> &'static str {
        "failing"
    }

    async fn insert_many(&self, _books: Vec<NewBook>) -> Result<Vec<Book>, StoreError> {
        Err(unreachable_backend())
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        Err(unreachable_backend())
    }

    async fn find(&self, _id: &BookId) -> Result<Option<Book>, StoreError> {
        Err(unreachable_backend())
    }

    async fn update(
        &self,
        _id: &BookId,
        _changes: &BookChanges,
    ) -> Result<Option<Book>, StoreError> {
        Err(unreachable_backend())
    }

    async fn delete(&self, _id: &BookId) -> Result<bool, StoreError> {
        Err(unreachable_backend())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        Err(unreachable_backend())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unreachable_backend())
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
