use doccrud::{
    bson::{DateTime, doc},
    memory::InMemoryStore,
    prelude::*,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Person {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    age: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Note {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    text: String,
    #[serde(rename = "createdAt")]
    created_at: Option<DateTime>,
    #[serde(rename = "updatedAt")]
    updated_at: Option<DateTime>,
}

fn person(name: &str, age: i32) -> Person {
    Person { id: None, name: name.to_string(), age }
}

fn crud<T: Serialize + serde::de::DeserializeOwned>(collection: &str) -> BaseCrud<T> {
    let access = Collection::with_options(
        collection,
        InMemoryStore::new(),
        ModelOptions::default().with_timestamps(false),
    );

    BaseCrud::from_access(access)
}

#[tokio::test]
async fn save_and_read_back_typed_records() {
    let people = crud::<Person>("people");
    let created = people.save(&person("Ana", 30)).await.unwrap();

    let ana = people.get_by_id(&created.id).await.unwrap().unwrap();

    assert_eq!(ana.id.as_deref(), Some(created.id.as_str()));
    assert_eq!(ana.name, "Ana");
    assert_eq!(people.collection_name(), "people");
}

#[tokio::test]
async fn save_with_id_overwrites() {
    let people = crud::<Person>("people");
    let mut ana = person("Ana", 30);
    ana.id = Some("ana".to_string());

    people.save(&ana).await.unwrap();
    ana.age = 31;
    people.save(&ana).await.unwrap();

    assert_eq!(people.get_by_id("ana").await.unwrap(), Some(ana));
}

#[tokio::test]
async fn find_defaults_to_ten_per_page() {
    let people = crud::<Person>("people");

    for n in 0..12 {
        people.save(&person(&format!("Person {n}"), n)).await.unwrap();
    }

    let first = people.find(FindRequest::default()).await.unwrap();
    assert_eq!(first.total, 12);
    assert_eq!(first.limited, 10);
    assert_eq!(first.list.len(), 10);

    let second = people
        .find(FindRequest::builder().order_by("age").offset(10, 10).build())
        .await
        .unwrap();
    assert_eq!(second.list.iter().map(|p| p.age).collect::<Vec<_>>(), vec![10, 11]);
    assert!(!second.has_next());
}

#[tokio::test]
async fn find_all_with_search() {
    let people = crud::<Person>("people");

    for (name, age) in [("Fábio", 20), ("Phabio", 21), ("Marcos", 22)] {
        people.save(&person(name, age)).await.unwrap();
    }

    let found = people
        .find_all(
            FindRequest::builder()
                .search("fabio")
                .search_field("name")
                .order_by("age")
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(
        found.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        vec!["Fábio", "Phabio"]
    );
}

#[tokio::test]
async fn update_and_partial_update() {
    let people = crud::<Person>("people");
    let created = people.save(&person("Ana", 30)).await.unwrap();

    let mut ana = people.get_by_id(&created.id).await.unwrap().unwrap();
    ana.name = "Ana Maria".to_string();
    people.update(&ana).await.unwrap();

    people
        .partial_update(&created.id, doc! { "age": 31 })
        .await
        .unwrap();

    let stored = people.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Ana Maria");
    assert_eq!(stored.age, 31);
}

#[tokio::test]
async fn update_without_id_fails() {
    let people = crud::<Person>("people");
    let result = people.update(&person("Nobody", 1)).await;

    assert!(matches!(result, Err(DocumentStoreError::InvalidDocument(_))));
}

#[tokio::test]
async fn declared_timestamps_are_filled() {
    let notes = crud::<Note>("notes");
    let created = notes
        .save(&Note {
            id: None,
            text: "hello".to_string(),
            created_at: None,
            updated_at: None,
        })
        .await
        .unwrap();

    let note = notes.get_by_id(&created.id).await.unwrap().unwrap();
    let created_at = note.created_at.unwrap();
    assert!(note.updated_at.is_some());

    let mut edited = note.clone();
    edited.text = "edited".to_string();
    notes.update(&edited).await.unwrap();

    let reread = notes.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(reread.text, "edited");
    assert_eq!(reread.created_at, Some(created_at));
    assert!(reread.updated_at.unwrap() >= created_at);
}

#[tokio::test]
async fn undeclared_timestamps_are_not_added() {
    let people = crud::<Person>("people");
    let created = people.save(&person("Ana", 30)).await.unwrap();

    let raw = people.access().get_by_id(&created.id).await.unwrap().unwrap();

    assert!(!raw.contains_key("createdAt"));
    assert!(!raw.contains_key("updatedAt"));
}

#[tokio::test]
async fn delete_then_get_is_none() {
    let people = crud::<Person>("people");
    let created = people.save(&person("Ana", 30)).await.unwrap();

    assert_eq!(
        people.delete(&created.id).await.unwrap(),
        DeleteOutcome { success: true }
    );
    assert!(people.get_by_id(&created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn handles_share_the_same_access() {
    let people = crud::<Person>("people");
    let other = people.clone();

    let created = people.save(&person("Ana", 30)).await.unwrap();

    assert!(other.get_by_id(&created.id).await.unwrap().is_some());
}
