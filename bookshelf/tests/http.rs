//! HTTP behavior of the book endpoints, driven through the router without a socket.

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use bson::{Bson, Document as BsonDocument};

use bookshelf::{http::router, service::BookService};
use bookshelf_core::{
    backend::StoreBackend,
    document::DocumentId,
    error::{DocumentStoreError, DocumentStoreResult},
    store::{DocumentStore, IntoDynDocumentStore},
};
use bookshelf_memory::InMemoryStore;

fn app() -> Router {
    router(BookService::new(DocumentStore::new(InMemoryStore::new()).into_dyn()))
}

/// A backend whose every operation fails.
#[derive(Debug)]
struct Unreachable;

const CAUSE: &str = "connection refused by 10.0.0.7:27017";

fn refused<T>() -> DocumentStoreResult<T> {
    Err(DocumentStoreError::Backend(CAUSE.to_string()))
}

#[async_trait]
impl StoreBackend for Unreachable {
    async fn find_documents(&self, _collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        refused()
    }

    async fn find_document(&self, _id: &DocumentId, _collection: &str) -> DocumentStoreResult<Option<Bson>> {
        refused()
    }

    async fn insert_document(&self, _document: BsonDocument, _collection: &str) -> DocumentStoreResult<Bson> {
        refused()
    }

    async fn update_document(
        &self,
        _id: &DocumentId,
        _changes: BsonDocument,
        _collection: &str,
    ) -> DocumentStoreResult<Option<Bson>> {
        refused()
    }

    async fn delete_document(&self, _id: &DocumentId, _collection: &str) -> DocumentStoreResult<Option<Bson>> {
        refused()
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        refused()
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_dune(app: &Router) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/",
        Some(json!({ "title": "Dune", "author": "Herbert", "length": 412, "rating": 4.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    body
}

#[tokio::test]
async fn post_returns_the_stored_book() {
    let app = app();

    let book = create_dune(&app).await;

    assert!(book["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(book["title"], "Dune");
    assert_eq!(book["author"], "Herbert");
    assert_eq!(book["length"], 412);
    assert_eq!(book["rating"], 4.5);

    let uri = format!("/{}", book["id"].as_str().unwrap());
    assert_eq!(send(&app, Method::GET, &uri, None).await, (StatusCode::OK, book));
}

#[tokio::test]
async fn optional_fields_are_omitted_when_unset() {
    let app = app();

    let (status, book) = send(
        &app,
        Method::POST,
        "/",
        Some(json!({ "title": "Emma", "author": "Austen" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(book.get("length").is_none());
    assert!(book.get("rating").is_none());
}

#[tokio::test]
async fn list_returns_every_book() {
    let app = app();
    assert_eq!(send(&app, Method::GET, "/", None).await, (StatusCode::OK, json!([])));

    let book = create_dune(&app).await;

    assert_eq!(send(&app, Method::GET, "/", None).await, (StatusCode::OK, json!([book])));
}

#[tokio::test]
async fn unknown_id_is_404() {
    let app = app();

    let uri = "/6f1c2a9e-0000-4000-8000-000000000000";

    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Document Not Found" }));

    let (status, body) = send(&app, Method::DELETE, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Document not found" }));

    let (status, _) = send(&app, Method::PUT, "/not-an-id", Some(json!({ "rating": 1 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_create_is_400_with_details() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/", Some(json!({ "author": "Herbert" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "\"title\" is required");
    assert_eq!(
        body["details"],
        json!([{ "field": "title", "rule": "required", "message": "\"title\" is required" }])
    );
    assert_eq!(send(&app, Method::GET, "/", None).await.1, json!([]));
}

#[tokio::test]
async fn invalid_update_leaves_the_record_unchanged() {
    let app = app();
    let book = create_dune(&app).await;
    let uri = format!("/{}", book["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "rating": 7 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["rule"], "max");
    assert_eq!(send(&app, Method::GET, &uri, None).await, (StatusCode::OK, book));
}

#[tokio::test]
async fn put_applies_a_partial_update() {
    let app = app();
    let book = create_dune(&app).await;
    let uri = format!("/{}", book["id"].as_str().unwrap());

    let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({ "rating": 3 }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], book["id"]);
    assert_eq!(updated["title"], "Dune");
    assert_eq!(updated["length"], 412);
    assert_eq!(updated["rating"], 3.0);
}

#[tokio::test]
async fn delete_twice_is_200_then_404() {
    let app = app();
    let book = create_dune(&app).await;
    let uri = format!("/{}", book["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "message": "Document Deleted Successfully", "deletedDocument": book })
    );

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Document not found" }));
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn store_failures_are_500_without_the_cause() {
    let app = router(BookService::new(DocumentStore::new(Unreachable).into_dyn()));
    let id = DocumentId::new();
    let uri = format!("/{id}");
    let book = json!({ "title": "Dune", "author": "Herbert" });

    for (method, uri, body) in [
        (Method::GET, "/", None),
        (Method::GET, uri.as_str(), None),
        (Method::POST, "/", Some(book.clone())),
        (Method::PUT, uri.as_str(), Some(book)),
        (Method::DELETE, uri.as_str(), None),
    ] {
        let (status, body) = send(&app, method.clone(), uri, body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(body, json!({ "error": "Internal Server Error" }));
        assert!(!body.to_string().contains(CAUSE));
    }
}
