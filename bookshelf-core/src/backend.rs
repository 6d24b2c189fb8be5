//! Storage backend abstraction for the document store.
//!
//! This module defines the traits that abstract over different storage implementations,
//! allowing the document store to work with an in-memory map or a MongoDB database
//! through the same interface.
//!
//! # Overview
//!
//! The [`StoreBackend`] trait provides a unified async interface for single-document
//! lifecycle operations keyed by [`DocumentId`]. Implementations are required to be
//! thread-safe (`Send + Sync`) and support concurrent access.
//!
//! Every document a backend returns carries its identifier under
//! [`ID_FIELD`](crate::document::ID_FIELD), whatever the backend's native key is.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use bookshelf_core::backend::StoreBackend;
//! use bson::{Bson, doc};
//!
//! let backend = MyBackendImpl::new();
//!
//! let stored = backend
//!     .insert_document(doc! { "title": "Dune" }, "documents")
//!     .await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Bson, Document as BsonDocument};
use std::fmt::Debug;

use crate::{document::DocumentId, error::DocumentStoreResult};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks. Each method is a single operation against the store; concurrent writes to
/// the same document resolve as last-write-wins.
///
/// # Error Handling
///
/// An absent document is reported as `Ok(None)`, never as an error. Errors are reserved
/// for backend failures and malformed data.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Returns every document in a collection.
    ///
    /// The order is backend-defined. A collection that does not exist yields an empty
    /// vector.
    async fn find_documents(&self, collection: &str) -> DocumentStoreResult<Vec<Bson>>;

    /// Returns the document with the given id, or `None` if it does not exist.
    async fn find_document(
        &self,
        id: &DocumentId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>>;

    /// Inserts a new document, assigning it a fresh identifier.
    ///
    /// Any id-like field present in `document` is replaced. The collection is created if
    /// it doesn't exist.
    ///
    /// # Returns
    ///
    /// The document as stored, including its new [`ID_FIELD`](crate::document::ID_FIELD).
    async fn insert_document(
        &self,
        document: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<Bson>;

    /// Sets the given fields on an existing document, leaving every other field untouched.
    ///
    /// An empty `changes` document leaves the stored document as it is.
    ///
    /// # Returns
    ///
    /// The document after the update, or `None` if no document has the given id.
    async fn update_document(
        &self,
        id: &DocumentId,
        changes: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>>;

    /// Removes a document.
    ///
    /// # Returns
    ///
    /// The document as it was before removal, or `None` if no document has the given id.
    async fn delete_document(
        &self,
        id: &DocumentId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> DocumentStoreResult<()>;

    /// Shuts down the backend and releases any held resources.
    ///
    /// The default implementation is a no-op, but backends holding connections should
    /// override this to close them.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Object-safe counterpart of [`StoreBackend`], used when the backend is chosen at runtime.
///
/// Every [`StoreBackend`] implements this trait automatically.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn find_documents(&self, collection: &str) -> DocumentStoreResult<Vec<Bson>>;
    async fn find_document(
        &self,
        id: &DocumentId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>>;
    async fn insert_document(
        &self,
        document: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<Bson>;
    async fn update_document(
        &self,
        id: &DocumentId,
        changes: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>>;
    async fn delete_document(
        &self,
        id: &DocumentId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>>;
    async fn ping(&self) -> DocumentStoreResult<()>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;
}

#[async_trait]
impl<B: StoreBackend + Send + Sync + 'static> DynStoreBackend for B {
    async fn find_documents(&self, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        StoreBackend::find_documents(self, collection).await
    }

    async fn find_document(
        &self,
        id: &DocumentId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>> {
        StoreBackend::find_document(self, id, collection).await
    }

    async fn insert_document(
        &self,
        document: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<Bson> {
        StoreBackend::insert_document(self, document, collection).await
    }

    async fn update_document(
        &self,
        id: &DocumentId,
        changes: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>> {
        StoreBackend::update_document(self, id, changes, collection).await
    }

    async fn delete_document(
        &self,
        id: &DocumentId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>> {
        StoreBackend::delete_document(self, id, collection).await
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        StoreBackend::ping(self).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }
}

/// Factory trait for creating backend instances.
///
/// Builders carry connection settings and perform any async setup the backend needs.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
