//! In-memory document storage backend for bookshelf.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses an async-aware read-write lock for concurrent access and is the default backend
//! for development and tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use bookshelf_core::{backend::StoreBackendBuilder, store::DocumentStore};
//! use bookshelf_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await.unwrap());
//!     let books = store.typed_collection::<Book>();
//!
//!     let book = books
//!         .insert(&serde_json::json!({ "title": "Dune", "author": "Herbert" }))
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
