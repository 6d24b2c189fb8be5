//! Main document store interface for interacting with document backends.
//!
//! [`DynDocumentStore`] owns a backend chosen at runtime and hands out typed collections.
//! [`DocumentStore`] wraps a concrete backend until it is erased with
//! [`IntoDynDocumentStore::into_dyn`].
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_core::store::{DocumentStore, IntoDynDocumentStore};
//!
//! let store = DocumentStore::new(backend).into_dyn();
//! let books = store.typed_collection::<Book>();
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::DynTypedCollection,
    document::Document,
    error::DocumentStoreResult,
};

/// A document store bound to a specific backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

/// A document store whose backend is a trait object.
#[derive(Debug)]
pub struct DynDocumentStore {
    backend: Box<dyn DynStoreBackend>,
}

impl DynDocumentStore {
    /// Creates a new dynamic document store with the given backend trait object.
    pub fn new(backend: Box<dyn DynStoreBackend>) -> Self {
        Self { backend }
    }

    /// Gets a typed collection for the specified document type.
    pub fn typed_collection<'a, D: Document>(&'a self) -> DynTypedCollection<'a, D> {
        DynTypedCollection::new(D::collection_name().to_string(), &*self.backend)
    }

    /// Checks that the backend is reachable.
    pub async fn ping(&self) -> DocumentStoreResult<()> {
        self.backend.ping().await
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown_boxed().await
    }
}

/// Conversion trait for converting a document store into a dynamic owned store.
pub trait IntoDynDocumentStore {
    /// Converts this store into a dynamic owned store.
    fn into_dyn(self) -> DynDocumentStore;
}

impl<B: StoreBackend + 'static> IntoDynDocumentStore for DocumentStore<B> {
    fn into_dyn(self) -> DynDocumentStore {
        DynDocumentStore::new(Box::new(self.backend))
    }
}
