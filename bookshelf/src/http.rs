//! HTTP transport for the record service.
//!
//! ## Routes
//!
//! - `GET /` - every book
//! - `GET /{id}` - one book, 404 if absent
//! - `POST /` - create a book, 201 with the stored book
//! - `PUT /{id}` - partial update, 200 with the updated book
//! - `DELETE /{id}` - delete, 200 with `{ "message", "deletedDocument" }`
//!
//! Validation failures and unreadable bodies are 400, unknown ids are 404, and store
//! failures are 500 with the cause logged rather than returned. Delete reports an unknown
//! id as `Document not found`; the other routes say `Document Not Found`.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::{book::Book, error::ServiceError, service::BookService};

const NOT_FOUND_MESSAGE: &str = "Document Not Found";
const DELETE_NOT_FOUND_MESSAGE: &str = "Document not found";
const DELETED_MESSAGE: &str = "Document Deleted Successfully";

/// Build the router serving the book endpoints over the given service.
pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Error response for any failed request. The status is decided before the body is built.
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be read as JSON.
    Body(JsonRejection),
    /// No book has the requested id. Holds the message to report.
    NotFound(&'static str),
    Service(ServiceError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Body(rejection) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": rejection.body_text() }),
            ),
            Self::Service(ServiceError::Validation(err)) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": err.to_string(), "details": err.violations() }),
            ),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            Self::Service(ServiceError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                json!({ "error": NOT_FOUND_MESSAGE }),
            ),
            Self::Service(ServiceError::Store(err)) => {
                tracing::error!(error = %err, "document store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct Deleted {
    message: &'static str,
    #[serde(rename = "deletedDocument")]
    deleted_document: Book,
}

/// `GET /`
async fn list_books(State(service): State<BookService>) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(service.list().await?))
}

/// `GET /{id}`
async fn get_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(service.get(&id).await?))
}

/// `POST /`
async fn create_book(
    State(service): State<BookService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let Json(payload) = payload?;

    Ok((StatusCode::CREATED, Json(service.create(&payload).await?)))
}

/// `PUT /{id}`
async fn update_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let Json(payload) = payload?;

    Ok(Json(service.update(&id, &payload).await?))
}

/// `DELETE /{id}`
async fn delete_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    let deleted_document = service.delete(&id).await.map_err(|err| match err {
        ServiceError::NotFound(_) => ApiError::NotFound(DELETE_NOT_FOUND_MESSAGE),
        err => err.into(),
    })?;

    Ok(Json(Deleted {
        message: DELETED_MESSAGE,
        deleted_document,
    }))
}
