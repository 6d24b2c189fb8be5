use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, ReturnDocument},
};
use bookshelf_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{DocumentId, ID_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
};

const MONGO_ID: &str = "_id";

fn backend_error(err: mongodb::error::Error) -> DocumentStoreError {
    DocumentStoreError::Backend(err.to_string())
}

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    /// Stores the id as MongoDB's primary key, dropping any id the caller supplied.
    fn prepare_document(&self, id: &DocumentId, document: Document) -> Document {
        Document::from_iter(
            vec![(MONGO_ID.to_string(), Bson::from(*id))]
                .into_iter()
                .chain(
                    document
                        .into_iter()
                        .filter(|(k, _)| ![MONGO_ID, ID_FIELD].contains(&k.as_str())),
                ),
        )
    }

    /// Exposes MongoDB's primary key under [`ID_FIELD`].
    fn restore_document(&self, document: Document) -> Bson {
        Bson::Document(Document::from_iter(
            document
                .into_iter()
                .map(|(k, v)| if k == MONGO_ID { (ID_FIELD.to_string(), v) } else { (k, v) }),
        ))
    }

    fn by_id(id: &DocumentId) -> Document {
        doc! { MONGO_ID: *id }
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn find_documents(&self, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        Ok(
            self.get_collection(collection)
                .find(doc! {})
                .await
                .map_err(backend_error)?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(backend_error)?
                .into_iter()
                .map(|doc| self.restore_document(doc))
                .collect()
        )
    }

    async fn find_document(&self, id: &DocumentId, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        Ok(
            self.get_collection(collection)
                .find_one(Self::by_id(id))
                .await
                .map_err(backend_error)?
                .map(|doc| self.restore_document(doc))
        )
    }

    async fn insert_document(&self, document: Document, collection: &str) -> DocumentStoreResult<Bson> {
        let document = self.prepare_document(&DocumentId::new(), document);

        self.get_collection(collection)
            .insert_one(&document)
            .await
            .map_err(backend_error)?;

        Ok(self.restore_document(document))
    }

    async fn update_document(
        &self,
        id: &DocumentId,
        changes: Document,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>> {
        let changes = Document::from_iter(
            changes
                .into_iter()
                .filter(|(k, _)| ![MONGO_ID, ID_FIELD].contains(&k.as_str())),
        );

        // MongoDB rejects an empty $set
        if changes.is_empty() {
            return StoreBackend::find_document(self, id, collection).await;
        }

        Ok(
            self.get_collection(collection)
                .find_one_and_update(Self::by_id(id), doc! { "$set": changes })
                .return_document(ReturnDocument::After)
                .await
                .map_err(backend_error)?
                .map(|doc| self.restore_document(doc))
        )
    }

    async fn delete_document(&self, id: &DocumentId, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        Ok(
            self.get_collection(collection)
                .find_one_and_delete(Self::by_id(id))
                .await
                .map_err(backend_error)?
                .map(|doc| self.restore_document(doc))
        )
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
