//! Collection types for document store operations.
//!
//! [`DynTypedCollection`] is a typed view over a single collection. Documents go in as
//! any serializable value and come back out as the collection's [`Document`] type, with
//! the identifier the backend assigned.
//!
//! # Example
//!
//! ```ignore
//! # async fn example(store: &bookshelf_core::store::DynDocumentStore) -> bookshelf_core::error::DocumentStoreResult<()> {
//! let books = store.typed_collection::<Book>();
//! let book = books.insert(&serde_json::json!({ "title": "Dune", "author": "Herbert" })).await?;
//! let found = books.find_by_id(book.id()).await?;
//! # Ok(()) }
//! ```

use bson::Bson;
use serde::Serialize;
use std::marker::PhantomData;

use crate::{
    backend::DynStoreBackend,
    document::{Document, DocumentExt, DocumentId, to_bson_document},
    error::DocumentStoreResult,
};

fn decode_all<D: Document>(documents: Vec<Bson>) -> DocumentStoreResult<Vec<D>> {
    documents
        .into_iter()
        .map(D::from_bson)
        .collect()
}

fn decode_one<D: Document>(document: Option<Bson>) -> DocumentStoreResult<Option<D>> {
    document
        .map(D::from_bson)
        .transpose()
}

/// A typed collection backed by a trait object, for backends chosen at runtime.
#[derive(Debug)]
pub struct DynTypedCollection<'a, D: Document> {
    name: String,
    backend: &'a dyn DynStoreBackend,
    _marker: PhantomData<D>,
}

impl<'a, D: Document> DynTypedCollection<'a, D> {
    pub(crate) fn new(name: String, backend: &'a dyn DynStoreBackend) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every document in the collection, in backend-defined order.
    pub async fn find_all(&self) -> DocumentStoreResult<Vec<D>> {
        decode_all(
            self.backend
                .find_documents(self.name())
                .await?,
        )
    }

    /// Retrieves the document with the given id.
    pub async fn find_by_id(&self, id: &DocumentId) -> DocumentStoreResult<Option<D>> {
        decode_one(
            self.backend
                .find_document(id, self.name())
                .await?,
        )
    }

    /// Inserts a new document built from `fields` and returns it with its assigned id.
    pub async fn insert<T>(&self, fields: &T) -> DocumentStoreResult<D>
    where
        T: Serialize + ?Sized,
    {
        D::from_bson(
            self.backend
                .insert_document(to_bson_document(fields)?, self.name())
                .await?,
        )
    }

    /// Sets every field present in `changes` on the document with the given id.
    pub async fn find_by_id_and_update<T>(
        &self,
        id: &DocumentId,
        changes: &T,
    ) -> DocumentStoreResult<Option<D>>
    where
        T: Serialize + ?Sized,
    {
        decode_one(
            self.backend
                .update_document(id, to_bson_document(changes)?, self.name())
                .await?,
        )
    }

    /// Deletes the document with the given id, returning its prior content.
    pub async fn find_by_id_and_delete(&self, id: &DocumentId) -> DocumentStoreResult<Option<D>> {
        decode_one(
            self.backend
                .delete_document(id, self.name())
                .await?,
        )
    }
}
