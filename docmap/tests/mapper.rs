mod common;

use common::{Counter, Note, Profile, Test};
use docmap::{
    bson::{Bson, oid::ObjectId},
    memory::InMemoryStore,
    prelude::*,
};
use serde::{Deserialize, Serialize};

fn mapper() -> (InMemoryStore, DocumentMapper<InMemoryStore>) {
    let store = InMemoryStore::new();
    (store.clone(), DocumentMapper::new(store))
}

#[tokio::test]
async fn insert_then_find_round_trips() {
    let (_, mapper) = mapper();

    let inserted = mapper.insert(&Test::named("foo")).await.unwrap();
    let id = inserted.entity.id.expect("insert assigns a key");

    assert_eq!(inserted.id, Bson::ObjectId(id));
    assert_eq!(inserted.entity.name, "foo");
    assert_eq!(mapper.find_by_id::<Test, _>(id).await.unwrap(), inserted.entity);
}

#[tokio::test]
async fn insert_keeps_a_caller_supplied_key() {
    let (_, mapper) = mapper();
    let profile = Profile { handle: "ada".into(), name: "Ada".into(), nickname: None };

    let inserted = mapper.insert(&profile).await.unwrap();

    assert_eq!(inserted.id, Bson::String("ada".into()));
    assert_eq!(inserted.entity, profile);
}

#[tokio::test]
async fn exists_follows_insert_and_delete() {
    let (_, mapper) = mapper();

    let test = mapper.insert(&Test::named("foo")).await.unwrap().entity;
    assert!(mapper.exists(&test).await.unwrap());

    mapper.delete(&test).await.unwrap();
    assert!(!mapper.exists(&test).await.unwrap());
}

#[tokio::test]
async fn exists_is_false_for_unset_keys() {
    let (_, mapper) = mapper();
    assert!(!mapper.exists(&Test::named("foo")).await.unwrap());
}

#[tokio::test]
async fn save_with_unset_key_inserts() {
    let (store, mapper) = mapper();

    let saved = mapper.save(&Test::named("foo")).await.unwrap();

    assert!(saved.id.is_some());
    assert_eq!(saved.name, "foo");
    assert_eq!(store.len("Test").await, 1);
}

#[tokio::test]
async fn save_with_unknown_key_inserts_under_that_key() {
    let (store, mapper) = mapper();
    let id = ObjectId::new();

    let saved = mapper
        .save(&Test { id: Some(id), name: "foo".into() })
        .await
        .unwrap();

    assert_eq!(saved.id, Some(id));
    assert_eq!(mapper.find_by_id::<Test, _>(id).await.unwrap(), saved);
    assert_eq!(store.len("Test").await, 1);
}

#[tokio::test]
async fn save_with_stored_key_replaces_the_whole_document() {
    let (store, mapper) = mapper();
    let original = Profile {
        handle: "ada".into(),
        name: "Ada".into(),
        nickname: Some("countess".into()),
    };
    mapper.insert(&original).await.unwrap();

    let changed = Profile { name: "Ada Lovelace".into(), nickname: None, ..original };
    let saved = mapper.save(&changed).await.unwrap();

    assert_eq!(saved, changed);
    assert_eq!(mapper.find_by_id::<Profile, _>("ada").await.unwrap(), changed);
    assert_eq!(store.len("profiles").await, 1);
}

#[tokio::test]
async fn empty_string_key_is_rejected_before_writing() {
    let (store, mapper) = mapper();
    let blank = Profile { handle: String::new(), name: "Ada".into(), nickname: None };

    let err = mapper.save(&blank).await.unwrap_err();
    assert!(matches!(err, DocumentMapperError::InvalidArgument(_)));

    let err = mapper.insert(&blank).await.unwrap_err();
    assert!(matches!(err, DocumentMapperError::InvalidArgument(_)));

    assert_eq!(store.len("profiles").await, 0);
}

#[tokio::test]
async fn zero_key_is_stored_not_generated() {
    let (_, mapper) = mapper();

    let saved = mapper.save(&Counter { id: 0, value: 1 }).await.unwrap();
    assert_eq!(saved, Counter { id: 0, value: 1 });

    let saved = mapper.save(&Counter { id: 0, value: 2 }).await.unwrap();
    assert_eq!(saved.value, 2);
    assert_eq!(mapper.find_all::<Counter>().await.unwrap(), vec![saved]);
}

#[tokio::test]
async fn find_by_missing_id_is_not_found() {
    let (_, mapper) = mapper();

    let err = mapper.find_by_id::<Test, _>(ObjectId::new()).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_reports_missing_documents() {
    let (_, mapper) = mapper();

    let err = mapper
        .delete(&Test { id: Some(ObjectId::new()), name: "foo".into() })
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = mapper.delete(&Test::named("foo")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn keyless_types_fail_key_operations() {
    let (_, mapper) = mapper();
    let note = Note { text: "hi".into() };

    assert!(matches!(
        mapper.exists(&note).await,
        Err(DocumentMapperError::MissingKeyField(name)) if name == "Note"
    ));
    assert!(matches!(
        mapper.save(&note).await,
        Err(DocumentMapperError::MissingKeyField(_))
    ));
    assert!(matches!(
        mapper.delete(&note).await,
        Err(DocumentMapperError::MissingKeyField(_))
    ));

    // Insert does not need a key field
    let inserted = mapper.insert(&note).await.unwrap();
    assert_eq!(inserted.entity, note);
}

#[derive(Debug, Serialize, Deserialize)]
struct Scalar(i32);

impl Entity for Scalar {
    fn key(&self) -> KeyState {
        KeyState::Unset
    }
}

#[tokio::test]
async fn non_document_entities_are_rejected() {
    let (store, mapper) = mapper();

    let err = mapper.insert(&Scalar(1)).await.unwrap_err();

    assert!(matches!(err, DocumentMapperError::InvalidArgument(_)));
    assert_eq!(store.len("Scalar").await, 0);
}

#[tokio::test]
async fn mismatched_documents_fail_to_decode() {
    let (_, mapper) = mapper();

    let inserted = mapper.insert_into(&Test::named("foo"), "shared").await.unwrap();
    let err = mapper
        .find_by_id_in::<Counter, _>(inserted.id, "shared")
        .await
        .unwrap_err();

    assert!(matches!(err, DocumentMapperError::Serialization(_)));
}

#[tokio::test]
async fn explicit_collection_names_are_isolated() {
    let (store, mapper) = mapper();

    let test = mapper.insert_into(&Test::named("foo"), "archive").await.unwrap().entity;

    assert!(mapper.exists_in(&test, "archive").await.unwrap());
    assert!(!mapper.exists(&test).await.unwrap());
    assert!(mapper.find_by_id::<Test, _>(test.id.unwrap()).await.unwrap_err().is_not_found());
    assert_eq!(mapper.find_all_in::<Test>("archive").await.unwrap(), vec![test.clone()]);

    mapper.delete_from(&test, "archive").await.unwrap();
    assert_eq!(store.len("archive").await, 0);
}

#[tokio::test]
async fn find_all_returns_documents_in_insertion_order() {
    let (_, mapper) = mapper();

    assert!(mapper.find_all::<Test>().await.unwrap().is_empty());

    let first = mapper.insert(&Test::named("a")).await.unwrap().entity;
    let second = mapper.insert(&Test::named("b")).await.unwrap().entity;

    assert_eq!(mapper.find_all::<Test>().await.unwrap(), vec![first, second]);
}

#[tokio::test]
async fn insert_save_delete_scenario() {
    let (_, mapper) = mapper();

    let inserted = mapper.insert(&Test::named("foo")).await.unwrap();
    let key = inserted.entity.id.unwrap();
    assert_eq!(inserted.entity, Test { id: Some(key), name: "foo".into() });

    let mut test = inserted.entity;
    test.name = "bar".into();
    mapper.save(&test).await.unwrap();

    assert_eq!(
        mapper.find_by_id::<Test, _>(key).await.unwrap(),
        Test { id: Some(key), name: "bar".into() }
    );

    mapper.delete(&test).await.unwrap();
    assert!(mapper.find_by_id::<Test, _>(key).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn typed_collections_bind_type_and_name() {
    let (store, mapper) = mapper();
    let tests = mapper.typed_collection::<Test>();
    let archived = mapper.typed_collection_named::<Test>("archive");

    assert_eq!(tests.name(), "Test");
    assert_eq!(archived.name(), "archive");

    let test = tests.insert(&Test::named("foo")).await.unwrap().entity;
    let saved = archived.save(&test).await.unwrap();

    assert_eq!(saved, test);
    assert!(tests.exists(&test).await.unwrap());
    assert!(archived.exists(&test).await.unwrap());
    assert_eq!(archived.find_by_id(test.id.unwrap()).await.unwrap(), test);

    archived.delete(&test).await.unwrap();
    assert_eq!(archived.find_all().await.unwrap(), vec![]);
    assert_eq!(store.len("Test").await, 1);

    let as_notes = tests.with_type::<Note>();
    assert_eq!(as_notes.name(), "Test");
}
