//! Round trips against a local MongoDB server.
//!
//! Run with `cargo test -p doccrud-mongodb -- --ignored` while a server listens on
//! `mongodb://localhost:27017`.

use bson::doc;
use doccrud_core::{
    collection::{Collection, CrudAccess, ModelOptions},
    error::DocumentStoreError,
    query::FindRequest,
};
use doccrud_mongodb::{MongoConfig, MongoDbAccess, MongoDbStore};
use uuid::Uuid;

fn config() -> MongoConfig {
    MongoConfig::new("mongodb://localhost:27017", "test").with_prefix("test_")
}

async fn people() -> Collection<MongoDbStore> {
    MongoDbAccess::get_instance("test_a", Some("test"), ModelOptions::default(), Some(config()))
        .await
        .unwrap()
}

#[tokio::test]
async fn empty_url_is_rejected() {
    let result = MongoDbAccess::get_instance(
        "test_a",
        None,
        ModelOptions::default(),
        Some(MongoConfig::new("", "test")),
    )
    .await;

    assert!(matches!(result, Err(DocumentStoreError::MissingConfig(_))));
}

#[tokio::test]
#[ignore = "needs a local MongoDB server"]
async fn insert_without_id_generates_one() {
    let people = people().await;
    let created = people.insert(doc! { "name": "Xavier" }).await.unwrap();

    assert!(Uuid::parse_str(&created.id).is_ok());
}

#[tokio::test]
#[ignore = "needs a local MongoDB server"]
async fn insert_with_id_then_find() {
    let people = people().await;
    let id = Uuid::new_v4().to_string();

    let created = people
        .insert(doc! { "id": id.as_str(), "name": "Beatriz", "age": 31 })
        .await
        .unwrap();
    assert_eq!(created.id, id);

    let found = people.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(found.get_str("id").unwrap(), id);

    let page = people
        .find(
            &FindRequest::builder()
                .filter(doc! { "id": id.as_str(), "name": "Beatriz" })
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.list[0].get_str("id").unwrap(), id);

    let everything = people.find(&FindRequest::default()).await.unwrap();
    assert!(everything.total >= 1);
}

#[tokio::test]
#[ignore = "needs a local MongoDB server"]
async fn insert_with_same_id_updates() {
    let people = people().await;
    let id = Uuid::new_v4().to_string();

    people.insert(doc! { "id": id.as_str(), "name": "Ana" }).await.unwrap();
    people.insert(doc! { "id": id.as_str(), "name": "Name changed" }).await.unwrap();

    let found = people.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(found.get_str("name").unwrap(), "Name changed");
}

#[tokio::test]
#[ignore = "needs a local MongoDB server"]
async fn partial_update_keeps_nested_siblings_and_search_finds_it() {
    let people = people().await;
    let created = people
        .insert(doc! { "details": { "name": "Name change test", "age": 18 } })
        .await
        .unwrap();

    people
        .partial_update(&created.id, doc! { "details": { "age": 19 } })
        .await
        .unwrap();

    let found = people.get_by_id(&created.id).await.unwrap().unwrap();
    let details = found.get_document("details").unwrap();
    assert_eq!(details.get_str("name").unwrap(), "Name change test");
    assert_eq!(details.get_i32("age").unwrap(), 19);

    let page = people
        .find(
            &FindRequest::builder()
                .search("change")
                .search_field("details.name")
                .build(),
        )
        .await
        .unwrap();
    assert!(page.total > 0);
}

#[tokio::test]
#[ignore = "needs a local MongoDB server"]
async fn instances_share_one_connection_and_model() {
    let first = people().await;
    let second = people().await;
    let other = MongoDbAccess::get_instance("test_b", Some("test"), ModelOptions::default(), Some(config()))
        .await
        .unwrap();

    assert_eq!(first.backend().database(), "test_test");
    assert_eq!(second.name(), first.name());
    assert_eq!(other.backend().database(), "test_test");
    assert!(MongoDbAccess::cache().model_count().await >= 2);
}

#[tokio::test]
#[ignore = "needs a local MongoDB server"]
async fn delete_is_idempotent() {
    let people = people().await;
    let created = people.insert(doc! { "name": "Temporary" }).await.unwrap();

    assert!(people.delete(&created.id).await.unwrap().success);
    assert!(people.delete(&created.id).await.unwrap().success);
    assert!(people.get_by_id(&created.id).await.unwrap().is_none());
}
