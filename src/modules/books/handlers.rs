//! `/books` route handlers.
//!
//! Every id-bearing handler parses the identifier before reading the body or
//! touching storage, so a malformed id always answers 400 `Invalid book ID`.
//! That includes path segments axum cannot decode at all.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookshelf_db::{Book, BookId, BookInput, BookPatch, BookRepo, StoreError};
use bookshelf_http::{ApiJson, AppError};
use serde_json::Value;

use super::models::{Confirmation, CreatePayload};

const INVALID_ID: &str = "Invalid book ID";
const NOT_FOUND: &str = "Book not found";

/// Map persistence outcomes onto the HTTP error contract
pub fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::Validation(err) => AppError::validation(err.to_string()),
        StoreError::InvalidIdentifier(_) => AppError::invalid_id(INVALID_ID),
        StoreError::NotFound(_) => AppError::not_found(NOT_FOUND),
        StoreError::Backend(err) => AppError::Internal(err),
    }
}

fn parse_id(path: Result<Path<String>, PathRejection>) -> Result<BookId, AppError> {
    let Path(raw) = path.map_err(|rejection| {
        tracing::debug!(%rejection, "undecodable book id");
        AppError::invalid_id(INVALID_ID)
    })?;
    BookId::parse(&raw).map_err(store_error)
}

/// `GET /books`
pub async fn list_books(State(repo): State<BookRepo>) -> Result<Json<Vec<Book>>, AppError> {
    let books = repo.find_all().await.map_err(store_error)?;
    Ok(Json(books))
}

/// `GET /books/{id}`
pub async fn get_book(
    State(repo): State<BookRepo>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = parse_id(id)?;
    let book = repo.find_by_id(id).await.map_err(store_error)?;
    Ok(Json(book))
}

/// `POST /books` with either one book object or an array of them
pub async fn create_books(
    State(repo): State<BookRepo>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Response, AppError> {
    match CreatePayload::from_json(body).map_err(AppError::bad_request)? {
        CreatePayload::One(input) => create_one(&repo, input).await,
        CreatePayload::Many(inputs) => create_many(&repo, inputs).await,
    }
}

async fn create_one(repo: &BookRepo, input: BookInput) -> Result<Response, AppError> {
    let book = repo.insert_one(input).await.map_err(store_error)?;
    tracing::info!(book_id = %book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)).into_response())
}

async fn create_many(repo: &BookRepo, inputs: Vec<BookInput>) -> Result<Response, AppError> {
    let books = repo.insert_many(inputs).await.map_err(store_error)?;
    tracing::info!(count = books.len(), "books created");
    Ok((StatusCode::CREATED, Json(books)).into_response())
}

/// `PUT /books/{id}` with any subset of the book fields
pub async fn update_book(
    State(repo): State<BookRepo>,
    id: Result<Path<String>, PathRejection>,
    body: Result<ApiJson<BookPatch>, AppError>,
) -> Result<Json<Book>, AppError> {
    let id = parse_id(id)?;
    let ApiJson(patch) = body?;
    let book = repo.update_by_id(id, patch).await.map_err(store_error)?;
    tracing::info!(book_id = %book.id, "book updated");
    Ok(Json(book))
}

/// `DELETE /books/{id}`
pub async fn delete_book(
    State(repo): State<BookRepo>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Confirmation>, AppError> {
    let id = parse_id(id)?;
    repo.delete_by_id(id).await.map_err(store_error)?;
    tracing::info!(book_id = %id, "book deleted");
    Ok(Json(Confirmation {
        message: "Book deleted successfully",
    }))
}

/// `DELETE /books`
pub async fn delete_all_books(
    State(repo): State<BookRepo>,
) -> Result<Json<Confirmation>, AppError> {
    let removed = repo.delete_all().await.map_err(store_error)?;
    tracing::info!(removed, "all books deleted");
    Ok(Json(Confirmation {
        message: "All books deleted successfully",
    }))
}
