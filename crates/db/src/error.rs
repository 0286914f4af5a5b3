use thiserror::Error;

use crate::models::book::BookId;

/// A book payload that breaks the record schema.
///
/// Rendered as `<scope> failed: <field>: <reason>`, e.g.
/// ``Book validation failed: title: Path `title` is required.``
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{scope} failed: {field}: {reason}")]
pub struct ValidationError {
    pub scope: &'static str,
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    /// Missing or blank required field on a new record.
    pub fn required(field: &'static str) -> Self {
        Self {
            scope: "Book validation",
            field,
            reason: format!("Path `{field}` is required."),
        }
    }

    /// Required field blanked out by a partial update.
    pub fn required_in_update(field: &'static str) -> Self {
        Self {
            scope: "Validation",
            ..Self::required(field)
        }
    }
}

/// Outcome of a persistence operation that did not succeed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid book identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("book {0} not found")]
    NotFound(BookId),

    /// The document store was unreachable or rejected the operation.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_message_matches_record_scope() {
        assert_eq!(
            ValidationError::required("title").to_string(),
            "Book validation failed: title: Path `title` is required."
        );
    }

    #[test]
    fn update_message_uses_generic_scope() {
        assert_eq!(
            ValidationError::required_in_update("title").to_string(),
            "Validation failed: title: Path `title` is required."
        );
    }

    #[test]
    fn validation_errors_convert_transparently() {
        let err: StoreError = ValidationError::required("title").into();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(err.to_string().contains("required"));
    }
}
