//! MongoDB backend implementation for bookshelf.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! Documents keep their identifier in MongoDB's `_id` field; it is exposed as `id`
//! to the rest of the workspace.
//!
//! To use this backend, enable the `mongodb` feature of the `bookshelf` crate (on by
//! default) and select it in configuration:
//!
//! ```toml
//! [store]
//! backend = "mongodb"
//! uri = "mongodb://localhost:27017"
//! database = "crud_api"
//! ```
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_core::backend::StoreBackendBuilder;
//! use bookshelf_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "crud_api")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
