//! Record service behavior over the in-memory backend.

use serde_json::json;

use bookshelf::{
    error::ServiceError,
    service::BookService,
    validate::Rule,
};
use bookshelf_core::{
    document::DocumentId,
    store::{DocumentStore, IntoDynDocumentStore},
};
use bookshelf_memory::InMemoryStore;

fn test_service() -> BookService {
    BookService::new(DocumentStore::new(InMemoryStore::new()).into_dyn())
}

#[tokio::test]
async fn list_starts_empty() {
    let service = test_service();

    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let service = test_service();

    let created = service
        .create(&json!({ "title": "Dune", "author": "Herbert", "length": 412, "rating": 4.5 }))
        .await
        .unwrap();

    assert_eq!(created.title, "Dune");
    assert_eq!(created.author, "Herbert");
    assert_eq!(created.length, Some(412));
    assert_eq!(created.rating, Some(4.5));
    assert_eq!(service.get(&created.id.to_string()).await.unwrap(), created);
}

#[tokio::test]
async fn create_without_required_fields_persists_nothing() {
    let service = test_service();

    for payload in [json!({ "author": "Herbert" }), json!({ "title": "Dune" }), json!({})] {
        let err = service.create(&payload).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
    }

    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn rating_above_five_fails_create_and_update() {
    let service = test_service();

    let err = service
        .create(&json!({ "title": "Dune", "author": "Herbert", "rating": 6 }))
        .await
        .unwrap_err();
    let ServiceError::Validation(err) = err else {
        panic!("expected a validation failure, got {err:?}");
    };
    assert_eq!(err.violations()[0].field, "rating");
    assert_eq!(err.violations()[0].rule, Rule::Max);

    let book = service
        .create(&json!({ "title": "Dune", "author": "Herbert", "rating": 4 }))
        .await
        .unwrap();
    let err = service
        .update(&book.id.to_string(), &json!({ "rating": 7 }))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(service.get(&book.id.to_string()).await.unwrap(), book);
}

#[tokio::test]
async fn update_merges_only_given_fields() {
    let service = test_service();
    let book = service
        .create(&json!({ "title": "Dune", "author": "Herbert", "length": 412 }))
        .await
        .unwrap();

    let updated = service
        .update(&book.id.to_string(), &json!({ "rating": 3 }))
        .await
        .unwrap();

    assert_eq!(updated.id, book.id);
    assert_eq!(updated.title, "Dune");
    assert_eq!(updated.author, "Herbert");
    assert_eq!(updated.length, Some(412));
    assert_eq!(updated.rating, Some(3.0));
    assert_eq!(service.get(&book.id.to_string()).await.unwrap(), updated);
}

#[tokio::test]
async fn empty_update_returns_the_current_record() {
    let service = test_service();
    let book = service
        .create(&json!({ "title": "Dune", "author": "Herbert" }))
        .await
        .unwrap();

    assert_eq!(service.update(&book.id.to_string(), &json!({})).await.unwrap(), book);
}

#[tokio::test]
async fn update_cannot_change_the_id() {
    let service = test_service();
    let book = service
        .create(&json!({ "title": "Dune", "author": "Herbert" }))
        .await
        .unwrap();

    let err = service
        .update(&book.id.to_string(), &json!({ "id": DocumentId::new().to_string() }))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(service.get(&book.id.to_string()).await.unwrap().id, book.id);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let service = test_service();
    let unknown = DocumentId::new().to_string();

    assert!(matches!(service.get(&unknown).await, Err(ServiceError::NotFound(_))));
    assert!(matches!(
        service.update(&unknown, &json!({ "rating": 1 })).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(service.delete(&unknown).await, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn malformed_ids_are_not_found() {
    let service = test_service();

    assert!(matches!(service.get("not-an-id").await, Err(ServiceError::NotFound(id)) if id == "not-an-id"));
    assert!(matches!(service.delete("42").await, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn validation_is_checked_before_lookup() {
    let service = test_service();

    let err = service
        .update(&DocumentId::new().to_string(), &json!({ "rating": 9 }))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn delete_twice_fails_the_second_time() {
    let service = test_service();
    let book = service
        .create(&json!({ "title": "Dune", "author": "Herbert" }))
        .await
        .unwrap();
    let id = book.id.to_string();

    assert_eq!(service.delete(&id).await.unwrap(), book);
    assert!(matches!(service.delete(&id).await, Err(ServiceError::NotFound(_))));
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_returns_every_book() {
    let service = test_service();

    for title in ["Dune", "Emma", "Ulysses"] {
        service
            .create(&json!({ "title": title, "author": "Someone" }))
            .await
            .unwrap();
    }

    let mut titles: Vec<String> = service
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    titles.sort();

    assert_eq!(titles, ["Dune", "Emma", "Ulysses"]);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let service = test_service();

    let handles: Vec<_> = (0..16)
        .map(|n| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create(&json!({ "title": format!("Book {n}"), "author": "Someone" }))
                    .await
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 16);
    assert_eq!(service.list().await.unwrap().len(), 16);
}

#[tokio::test]
async fn shutdown_waits_for_the_last_handle() {
    let service = test_service();
    let clone = service.clone();

    service.shutdown().await.unwrap();
    clone.ping().await.unwrap();
    clone.shutdown().await.unwrap();
}
