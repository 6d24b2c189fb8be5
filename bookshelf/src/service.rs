//! The record service: the five book operations over the document store.
//!
//! Writes go through [`validate`] first; reads go straight to the store. Every operation
//! is a single call to the store and the service keeps no state of its own besides the
//! store handle it was constructed with.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use bookshelf_core::{
    collection::DynTypedCollection,
    document::DocumentId,
    error::DocumentStoreResult,
    store::DynDocumentStore,
};

use crate::{
    book::Book,
    error::{ServiceError, ServiceResult},
    validate::{Mode, validate},
};

/// Book operations backed by a shared document store.
///
/// Cloning is cheap; clones share the same store.
#[derive(Debug, Clone)]
pub struct BookService {
    store: Arc<DynDocumentStore>,
}

impl BookService {
    /// Creates a service over the given store.
    pub fn new(store: DynDocumentStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    fn books(&self) -> DynTypedCollection<'_, Book> {
        self.store.typed_collection::<Book>()
    }

    /// Returns every book, in store-defined order.
    pub async fn list(&self) -> ServiceResult<Vec<Book>> {
        let books = self.books().find_all().await?;
        debug!(count = books.len(), "listed books");

        Ok(books)
    }

    /// Returns the book with the given id.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if no book has that id, including ids that are not
    /// well-formed.
    pub async fn get(&self, id: &str) -> ServiceResult<Book> {
        let key = parse_id(id)?;

        self.books()
            .find_by_id(&key)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Validates `payload` as a new book and stores it.
    ///
    /// # Returns
    ///
    /// The stored book, including the id the store assigned.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Validation`] if the payload is rejected; nothing is stored then.
    pub async fn create(&self, payload: &Value) -> ServiceResult<Book> {
        let fields = validate(payload, Mode::Create).inspect_err(|err| {
            info!(error = %err, "rejected book payload");
        })?;

        let book = self.books().insert(&fields).await?;
        debug!(id = %book.id, "created book");

        Ok(book)
    }

    /// Validates `payload` as a partial update and applies it to the book with the given id.
    ///
    /// Fields absent from the payload keep their stored value.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Validation`] if the payload is rejected (checked before the id is
    /// looked up), [`ServiceError::NotFound`] if no book has that id.
    pub async fn update(&self, id: &str, payload: &Value) -> ServiceResult<Book> {
        let changes = validate(payload, Mode::Update).inspect_err(|err| {
            info!(id, error = %err, "rejected book update");
        })?;
        let key = parse_id(id)?;

        let book = self
            .books()
            .find_by_id_and_update(&key, &changes)
            .await?
            .ok_or_else(|| not_found(id))?;
        debug!(id = %book.id, "updated book");

        Ok(book)
    }

    /// Deletes the book with the given id.
    ///
    /// # Returns
    ///
    /// The book as it was before deletion.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if no book has that id, so deleting twice fails the
    /// second time.
    pub async fn delete(&self, id: &str) -> ServiceResult<Book> {
        let key = parse_id(id)?;

        let book = self
            .books()
            .find_by_id_and_delete(&key)
            .await?
            .ok_or_else(|| not_found(id))?;
        debug!(id = %book.id, "deleted book");

        Ok(book)
    }

    /// Checks that the store is reachable.
    pub async fn ping(&self) -> DocumentStoreResult<()> {
        self.store.ping().await
    }

    /// Shuts the store down once this is the last handle to it.
    ///
    /// Returns without doing anything while other clones are alive.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        match Arc::into_inner(self.store) {
            Some(store) => store.shutdown().await,
            None => Ok(()),
        }
    }
}

fn not_found(id: &str) -> ServiceError {
    debug!(id, "book not found");
    ServiceError::NotFound(id.to_string())
}

/// A malformed id cannot name a stored book, so it is reported as not found.
fn parse_id(id: &str) -> ServiceResult<DocumentId> {
    id.parse().map_err(|_| not_found(id))
}
