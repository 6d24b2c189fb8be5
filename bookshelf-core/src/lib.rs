//! Document storage layer for the bookshelf service.
//!
//! This crate provides:
//!
//! - **Documents** ([`document`]) - The [`DocumentId`](document::DocumentId) type and the traits stored documents implement
//! - **Store backend abstraction** ([`backend`]) - Traits implemented by the in-memory and MongoDB backends
//! - **Collections** ([`collection`]) - Typed find/insert/update/delete by id over one collection
//! - **Document store** ([`store`]) - Owns a backend and hands out typed collections
//! - **Error handling** ([`error`]) - Error and result types shared by every backend
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_core::document::{Document, DocumentId};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Book {
//!     pub id: DocumentId,
//!     pub title: String,
//! }
//!
//! impl Document for Book {
//!     fn id(&self) -> &DocumentId {
//!         &self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "documents"
//!     }
//! }
//! ```

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod store;
