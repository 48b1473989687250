//! Error types and result types for mapper operations.
//!
//! Every fallible operation in this crate returns [`DocumentMapperResult<T>`]. Nothing is retried
//! or suppressed: the "no documents" condition of the store is surfaced as
//! [`DocumentMapperError::NotFound`], everything else the store reports passes through as
//! [`DocumentMapperError::Backend`].

use bson::error::Error as BsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when mapping entities to a document store.
#[derive(Error, Debug)]
pub enum DocumentMapperError {
    /// The entity does not serialize to a document, or a configuration value is invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The entity type has no field tagged as the primary key.
    /// The argument is the name of the entity type.
    #[error("Type {0} has no _id field")]
    MissingKeyField(String),
    /// No document matched the given key.
    /// The first argument is the key, the second is the collection name.
    #[error("Document not found {0} in collection {1}")]
    NotFound(String, String),
    /// A replace-by-key matched zero documents.
    /// The first argument is the key, the second is the collection name.
    #[error("No document modified for {0} in collection {1}")]
    NoDocumentModified(String, String),
    /// Connecting to the store or the liveness check failed.
    #[error("Connection error: {0}")]
    Connection(String),
    /// Serialization/deserialization error when converting between entities and BSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Any other error reported by the underlying store.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for mapper operations.
pub type DocumentMapperResult<T> = Result<T, DocumentMapperError>;

impl DocumentMapperError {
    /// Returns `true` if this error is the "no documents" outcome of a find or delete.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocumentMapperError::NotFound(..))
    }
}

impl From<BsonError> for DocumentMapperError {
    fn from(err: BsonError) -> Self {
        DocumentMapperError::Serialization(err.to_string())
    }
}
