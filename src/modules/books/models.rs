use bookshelf_db::BookInput;
use serde::Serialize;
use serde_json::Value;

/// `POST /books` body, split by shape before any domain logic runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePayload {
    One(BookInput),
    Many(Vec<BookInput>),
}

impl CreatePayload {
    /// Objects create one book, arrays create a batch; any other JSON value is refused.
    pub fn from_json(body: Value) -> Result<Self, String> {
        match body {
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<BookInput>, _>>()
                .map(CreatePayload::Many)
                .map_err(|err| format!("Invalid book in batch: {err}")),
            Value::Object(_) => serde_json::from_value(body)
                .map(CreatePayload::One)
                .map_err(|err| format!("Invalid book: {err}")),
            _ => Err("Request body must be a book object or an array of book objects".to_string()),
        }
    }
}

/// Confirmation body for deletes.
#[derive(Debug, Clone, Serialize)]
pub struct Confirmation {
    pub message: &'static str,
}
