//! Thin async client over the `/books` HTTP API.

use anyhow::{bail, Context};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};

/// A book as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        rename = "publishedYear",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub published_year: Option<i32>,
}

/// Fields sent on create and update; absent fields are left out of the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        rename = "publishedYear",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub published_year: Option<i32>,
}

impl BookFields {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.published_year.is_none()
    }
}

impl From<Book> for BookFields {
    fn from(book: Book) -> Self {
        Self {
            title: Some(book.title),
            author: book.author,
            published_year: book.published_year,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Confirmation {
    message: String,
}

pub struct BooksClient {
    http: reqwest::Client,
    base_url: String,
}

impl BooksClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn books_url(&self) -> String {
        format!("{}/books", self.base_url)
    }

    fn book_url(&self, id: &str) -> String {
        format!("{}/books/{}", self.base_url, id)
    }

    pub async fn list(&self) -> anyhow::Result<Vec<Book>> {
        let response = self.send(self.http.get(self.books_url())).await?;
        decode(response).await
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Book> {
        let response = self.send(self.http.get(self.book_url(id))).await?;
        decode(response).await
    }

    pub async fn create(&self, fields: &BookFields) -> anyhow::Result<Book> {
        let response = self
            .send(self.http.post(self.books_url()).json(fields))
            .await?;
        decode(response).await
    }

    /// Bulk insert; the server stores all of them or none.
    pub async fn create_many(&self, fields: &[BookFields]) -> anyhow::Result<Vec<Book>> {
        let response = self
            .send(self.http.post(self.books_url()).json(fields))
            .await?;
        decode(response).await
    }

    pub async fn update(&self, id: &str, fields: &BookFields) -> anyhow::Result<Book> {
        let response = self
            .send(self.http.put(self.book_url(id)).json(fields))
            .await?;
        decode(response).await
    }

    pub async fn delete(&self, id: &str) -> anyhow::Result<String> {
        let response = self.send(self.http.delete(self.book_url(id))).await?;
        let confirmation: Confirmation = decode(response).await?;
        Ok(confirmation.message)
    }

    pub async fn delete_all(&self) -> anyhow::Result<String> {
        let response = self.send(self.http.delete(self.books_url())).await?;
        let confirmation: Confirmation = decode(response).await?;
        Ok(confirmation.message)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> anyhow::Result<Response> {
        let response = request
            .send()
            .await
            .with_context(|| format!("failed to reach bookshelf API at {}", self.base_url))?;
        tracing::debug!(status = %response.status(), url = %response.url(), "api response");
        Ok(response)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> anyhow::Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .context("unexpected response body from bookshelf API");
    }

    let body = response.text().await.unwrap_or_default();
    bail!("{}", error_text(status, &body))
}

/// The server's `error` or `message` text, falling back to the raw body.
fn error_text(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .or_else(|| json.get("message"))
                .and_then(|value| value.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());

    if detail.is_empty() {
        format!("request failed with status {status}")
    } else {
        format!("{detail} (status {})", status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_text_prefers_error_then_message() {
        let text = error_text(StatusCode::BAD_REQUEST, r#"{"error":"Book validation failed"}"#);
        assert_eq!(text, "Book validation failed (status 400)");

        let text = error_text(StatusCode::NOT_FOUND, r#"{"message":"Book not found"}"#);
        assert_eq!(text, "Book not found (status 404)");

        let text = error_text(StatusCode::BAD_GATEWAY, "");
        assert!(text.contains("502"));
    }

    #[test]
    fn fields_skip_absent_keys() {
        let fields = BookFields {
            title: Some("Dune".to_string()),
            ..BookFields::default()
        };
        assert_eq!(serde_json::to_value(&fields).unwrap(), json!({ "title": "Dune" }));
        assert!(BookFields::default().is_empty());
    }

    #[test]
    fn book_reads_wire_keys() {
        let book: Book = serde_json::from_value(json!({
            "_id": "507f1f77bcf86cd799439011",
            "title": "1984",
            "publishedYear": 1949
        }))
        .unwrap();
        assert_eq!(book.id, "507f1f77bcf86cd799439011");
        assert_eq!(book.author, None);
        assert_eq!(book.published_year, Some(1949));
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = BooksClient::new("http://localhost:3000/");
        assert_eq!(client.book_url("abc"), "http://localhost:3000/books/abc");
    }
}
