//! Core traits and types for document representation and serialization.
//!
//! This module provides the identifier type assigned to stored documents, the trait that
//! all stored documents must implement, and utilities for converting documents to and
//! from BSON.

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Name of the field that carries a document's identifier in every stored document.
pub const ID_FIELD: &str = "id";

/// Opaque identifier assigned by the store when a document is inserted.
///
/// Identifiers are UUIDs and are always rendered as hyphenated strings, both in BSON and
/// in JSON, so that a stored document and its wire representation agree on the value.
///
/// # Example
///
/// ```ignore
/// use bookshelf_core::document::DocumentId;
///
/// let id = DocumentId::new();
/// let parsed: DocumentId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for DocumentId {
    type Err = DocumentStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DocumentStoreError::InvalidDocument(format!("malformed id {s:?}: {e}")))
    }
}

impl From<DocumentId> for Bson {
    fn from(id: DocumentId) -> Self {
        Bson::String(id.to_string())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(D::Error::custom)
    }
}

/// Core trait that all documents stored in a document store must implement.
///
/// Every document carries the identifier the store assigned to it and names the
/// collection it belongs to.
///
/// # Example
///
/// ```ignore
/// use bookshelf_core::document::{Document, DocumentId};
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Note {
///     pub id: DocumentId,
///     pub text: String,
/// }
///
/// impl Document for Note {
///     fn id(&self) -> &DocumentId {
///         &self.id
///     }
///
///     fn collection_name() -> &'static str {
///         "notes"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns a reference to this document's identifier.
    fn id(&self) -> &DocumentId;

    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Extension trait providing BSON conversion for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Creates a document from a BSON value returned by a backend.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}

/// Serializes any value into a BSON document.
///
/// Used for insert payloads and partial updates, which are not themselves [`Document`]s
/// because they carry no id yet.
///
/// # Errors
///
/// Returns [`DocumentStoreError::InvalidDocument`] if the value does not serialize to a
/// document (for example a bare string or number).
pub fn to_bson_document<T: Serialize + ?Sized>(value: &T) -> DocumentStoreResult<bson::Document> {
    match serialize_to_bson(value)? {
        Bson::Document(document) => Ok(document),
        other => Err(DocumentStoreError::InvalidDocument(format!(
            "expected a document, got {:?}",
            other.element_type()
        ))),
    }
}
