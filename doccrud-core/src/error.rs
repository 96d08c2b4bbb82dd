//! Error types and result types for CRUD operations.
//!
//! Use [`DocumentStoreResult<T>`] as the return type for fallible operations.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when reading or writing documents.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during backend initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The document has an invalid structure for the requested operation.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// The filter, sort or search request could not be translated into a query.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    /// A caller-supplied argument was empty or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
    /// Every connection attempt failed.
    #[error("Connection error, gave up after {attempts} attempts: {source}")]
    ConnectionRetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<DocumentStoreError>,
    },
    /// An unknown error occurred.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
