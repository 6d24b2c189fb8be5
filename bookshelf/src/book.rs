//! The book record and its normalized input form.

use serde::{Deserialize, Serialize};

use bookshelf_core::document::{Document, DocumentId};

/// Collection every book is stored in.
pub const COLLECTION: &str = "documents";

/// A stored book.
///
/// Optional fields that were never set are absent from both the stored document and the
/// JSON rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: DocumentId,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Document for Book {
    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn collection_name() -> &'static str {
        COLLECTION
    }
}

/// Book fields that passed validation.
///
/// Serializes only the fields that are present, so the same value works as an insert
/// payload and as a partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}
