//! Builds the document store selected in configuration.

use bookshelf_core::{
    backend::StoreBackendBuilder,
    error::DocumentStoreResult,
    store::{DocumentStore, DynDocumentStore, IntoDynDocumentStore},
};
use bookshelf_memory::InMemoryStore;

use crate::config::{StoreBackendKind, StoreConfig};

/// Opens the configured backend. Building a backend does not contact it; use
/// [`DynDocumentStore::ping`] to check connectivity.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Initialization`](bookshelf_core::error::DocumentStoreError::Initialization)
/// if the connection settings are invalid or the backend was not compiled in.
pub async fn open_store(config: &StoreConfig) -> DocumentStoreResult<DynDocumentStore> {
    match config.backend {
        StoreBackendKind::Memory => {
            tracing::info!("using in-memory document store");

            Ok(DocumentStore::new(InMemoryStore::builder().build().await?).into_dyn())
        }
        StoreBackendKind::Mongodb => open_mongodb(config).await,
    }
}

#[cfg(feature = "mongodb")]
async fn open_mongodb(config: &StoreConfig) -> DocumentStoreResult<DynDocumentStore> {
    use bookshelf_mongodb::MongoDbStore;

    tracing::info!(database = %config.database, "using MongoDB document store");

    Ok(DocumentStore::new(
        MongoDbStore::builder(&config.uri, &config.database)
            .build()
            .await?,
    )
    .into_dyn())
}

#[cfg(not(feature = "mongodb"))]
async fn open_mongodb(_config: &StoreConfig) -> DocumentStoreResult<DynDocumentStore> {
    Err(bookshelf_core::error::DocumentStoreError::Initialization(
        "the mongodb backend is not enabled in this build".to_string(),
    ))
}
