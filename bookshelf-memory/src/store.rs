//! In-memory storage implementation for document stores.
//!
//! Documents are kept as BSON documents in HashMaps guarded by an async-safe read-write
//! lock. Each backend operation takes the lock exactly once.

use async_trait::async_trait;
use bson::{Bson, Document as BsonDocument};
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};

use bookshelf_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{DocumentId, ID_FIELD},
    error::DocumentStoreResult,
};

type CollectionMap = HashMap<DocumentId, BsonDocument>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// # Ordering
///
/// [`find_documents`](StoreBackend::find_documents) returns documents in hash order,
/// which is unrelated to insertion order.
///
/// # Example
///
/// ```ignore
/// use bookshelf_memory::InMemoryStore;
/// use bookshelf_core::backend::StoreBackend;
/// use bson::doc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let stored = store.insert_document(doc! { "title": "Dune" }, "documents").await?;
///     let id = stored.as_document().unwrap().get_str("id")?.parse()?;
///
///     assert!(store.find_document(&id, "documents").await?.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder
    }
}

/// Copies a stored document, placing its id first under [`ID_FIELD`].
fn with_id(id: &DocumentId, document: &BsonDocument) -> Bson {
    let mut out = BsonDocument::new();
    out.insert(ID_FIELD, *id);

    for (key, value) in document {
        if key != ID_FIELD {
            out.insert(key.clone(), value.clone());
        }
    }

    Bson::Document(out)
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn find_documents(&self, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;

        Ok(store
            .get(collection)
            .map(|collection_map| {
                collection_map
                    .iter()
                    .map(|(id, doc)| with_id(id, doc))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_document(&self, id: &DocumentId, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        let store = self.store.read().await;

        Ok(store
            .get(collection)
            .and_then(|collection_map| collection_map.get(id))
            .map(|doc| with_id(id, doc)))
    }

    async fn insert_document(&self, mut document: BsonDocument, collection: &str) -> DocumentStoreResult<Bson> {
        let id = DocumentId::new();
        document.remove(ID_FIELD);

        let stored = with_id(&id, &document);

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id, document);

        Ok(stored)
    }

    async fn update_document(
        &self,
        id: &DocumentId,
        changes: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>> {
        let mut store = self.store.write().await;
        let Some(doc) = store
            .get_mut(collection)
            .and_then(|collection_map| collection_map.get_mut(id))
        else {
            return Ok(None);
        };

        // $set semantics: overwrite present keys, keep the rest
        for (key, value) in changes {
            if key != ID_FIELD {
                doc.insert(key, value);
            }
        }

        Ok(Some(with_id(id, doc)))
    }

    async fn delete_document(&self, id: &DocumentId, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        let mut store = self.store.write().await;

        Ok(store
            .get_mut(collection)
            .and_then(|collection_map| collection_map.remove(id))
            .map(|doc| with_id(id, &doc)))
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use bookshelf_memory::InMemoryStore;
/// use bookshelf_core::backend::StoreBackendBuilder;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryStore::builder().build().await.unwrap();
/// }
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    const COLLECTION: &str = "documents";

    fn id_of(stored: &Bson) -> DocumentId {
        stored
            .as_document()
            .unwrap()
            .get_str(ID_FIELD)
            .unwrap()
            .parse()
            .unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_a_fresh_id() {
        let store = InMemoryStore::new();

        let first = store
            .insert_document(doc! { "title": "Dune", "id": "caller-chosen" }, COLLECTION)
            .await
            .unwrap();
        let second = store
            .insert_document(doc! { "title": "Emma" }, COLLECTION)
            .await
            .unwrap();

        assert_ne!(id_of(&first), id_of(&second));
        assert_eq!(
            store.find_document(&id_of(&first), COLLECTION).await.unwrap(),
            Some(first)
        );
    }

    #[tokio::test]
    async fn missing_collection_reads_as_empty() {
        let store = InMemoryStore::new();

        assert!(store.find_documents(COLLECTION).await.unwrap().is_empty());
        assert_eq!(store.find_document(&DocumentId::new(), COLLECTION).await.unwrap(), None);
        assert_eq!(
            store
                .update_document(&DocumentId::new(), doc! { "title": "x" }, COLLECTION)
                .await
                .unwrap(),
            None
        );
        assert_eq!(store.delete_document(&DocumentId::new(), COLLECTION).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_merges_fields_and_keeps_id() {
        let store = InMemoryStore::new();
        let stored = store
            .insert_document(doc! { "title": "Dune", "author": "Herbert", "length": 412_i64 }, COLLECTION)
            .await
            .unwrap();
        let id = id_of(&stored);

        let updated = store
            .update_document(&id, doc! { "rating": 4.5, "id": "hijack" }, COLLECTION)
            .await
            .unwrap()
            .unwrap();

        let updated = updated.as_document().unwrap();
        assert_eq!(updated.get_str(ID_FIELD).unwrap(), id.to_string());
        assert_eq!(updated.get_str("title").unwrap(), "Dune");
        assert_eq!(updated.get_i64("length").unwrap(), 412);
        assert_eq!(updated.get_f64("rating").unwrap(), 4.5);
    }

    #[tokio::test]
    async fn delete_returns_prior_content_once() {
        let store = InMemoryStore::new();
        let stored = store
            .insert_document(doc! { "title": "Dune" }, COLLECTION)
            .await
            .unwrap();
        let id = id_of(&stored);

        assert_eq!(store.delete_document(&id, COLLECTION).await.unwrap(), Some(stored));
        assert_eq!(store.delete_document(&id, COLLECTION).await.unwrap(), None);
        assert!(store.find_documents(COLLECTION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryStore::builder().build().await.unwrap();
        let clone = store.clone();

        clone
            .insert_document(doc! { "title": "Dune" }, COLLECTION)
            .await
            .unwrap();

        assert_eq!(store.find_documents(COLLECTION).await.unwrap().len(), 1);
    }
}
