//! Error taxonomy shared by every [`DocumentStore`](crate::store::DocumentStore)
//! implementation.
//!
//! | Variant | Meaning | Typical HTTP mapping |
//! |---------|---------|----------------------|
//! | [`StoreError::Validation`] | malformed input (missing or unusable id) | 400 |
//! | [`StoreError::NotFound`] | no record exists for the id | 404 |
//! | [`StoreError::Storage`] | I/O or (de)serialization failure | 500 |

use std::error::Error as StdError;

use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed input. The caller's bug; never retried.
    #[error("invalid document: {0}")]
    Validation(String),

    /// No record exists for the id.
    #[error("document not found: {0}")]
    NotFound(String),

    /// Underlying I/O, serialization, or filesystem failure.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap a low-level failure with a description of what was attempted.
    pub fn storage<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        StoreError::Storage {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
