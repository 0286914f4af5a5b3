use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{StoreError, ValidationError};

/// Store-assigned book identifier: a 12-byte ObjectId written as 24 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(ObjectId);

impl BookId {
    /// Allocate a fresh identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Parse a path segment; anything but exactly 24 hex characters is rejected.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        if raw.len() != 24 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StoreError::InvalidIdentifier(raw.to_string()));
        }
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| StoreError::InvalidIdentifier(raw.to_string()))
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for BookId {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl FromStr for BookId {
    type Err = StoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for BookId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A stored book as exposed over the API.
///
/// `author` and `publishedYear` are omitted from the JSON form when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: BookId,
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

impl Book {
    /// Overwrite the supplied fields, leaving the rest untouched.
    pub fn apply(&mut self, changes: &BookChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(author) = &changes.author {
            self.author = Some(author.clone());
        }
        if let Some(year) = changes.published_year {
            self.published_year = Some(year);
        }
    }
}

/// Raw create payload. Every field is optional here so that a missing title
/// surfaces as a [`ValidationError`] rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, rename = "publishedYear")]
    pub published_year: Option<i32>,
}

impl BookInput {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Check the record schema and normalize the title.
    pub fn validate(self) -> Result<NewBook, ValidationError> {
        let title = normalize_title(self.title).ok_or_else(|| ValidationError::required("title"))?;

        Ok(NewBook {
            title,
            author: self.author,
            published_year: self.published_year,
        })
    }
}

/// A create payload that passed validation and is ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
    pub published_year: Option<i32>,
}

impl NewBook {
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            published_year: self.published_year,
        }
    }
}

/// Raw partial-update payload; `null` and absent both mean "keep".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, rename = "publishedYear")]
    pub published_year: Option<i32>,
}

impl BookPatch {
    /// A supplied title must still be non-blank.
    pub fn validate(self) -> Result<BookChanges, ValidationError> {
        let title = match self.title {
            Some(raw) => Some(
                normalize_title(Some(raw))
                    .ok_or_else(|| ValidationError::required_in_update("title"))?,
            ),
            None => None,
        };

        Ok(BookChanges {
            title,
            author: self.author,
            published_year: self.published_year,
        })
    }
}

/// Validated set of fields to overwrite on an existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_year: Option<i32>,
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.published_year.is_none()
    }
}

fn normalize_title(raw: Option<String>) -> Option<String> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == raw.len() {
        Some(raw)
    } else {
        Some(trimmed.to_string())
    }
}
