//! Outcomes of record service operations that are not a book.

use thiserror::Error;

use bookshelf_core::error::DocumentStoreError;

use crate::validate::ValidationError;

/// Why a [`BookService`](crate::service::BookService) operation did not produce a book.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The payload was rejected. This is a client error.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// No book has the requested id. Holds the id as given by the caller.
    #[error("Document not found: {0}")]
    NotFound(String),
    /// The document store failed.
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
}

/// A specialized `Result` type for record service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
