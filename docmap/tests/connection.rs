mod common;

use async_trait::async_trait;
use common::{Profile, Test};
use docmap::{
    bson::{Bson, Document},
    memory::{InMemoryCollection, InMemoryStore},
    prelude::*,
};
use std::sync::Arc;

#[tokio::test]
async fn connect_checks_liveness() {
    let err = DocumentMapper::connect(InMemoryStore::builder().offline())
        .await
        .unwrap_err();

    assert!(matches!(err, DocumentMapperError::Connection(_)));
}

#[tokio::test]
async fn connect_and_shutdown() {
    let mapper = DocumentMapper::connect(InMemoryStore::builder()).await.unwrap();

    mapper.insert(&Test::named("foo")).await.unwrap();
    assert_eq!(mapper.connection().cached_collections().await, vec!["Test".to_string()]);

    mapper.shutdown().await.unwrap();
}

#[tokio::test]
async fn same_collection_resolves_to_one_handle() {
    let store = InMemoryStore::new();
    let mapper = DocumentMapper::new(store.clone());

    let test = mapper.insert(&Test::named("foo")).await.unwrap().entity;
    mapper.exists(&test).await.unwrap();
    mapper.find_all_in::<Test>("Test").await.unwrap();
    mapper.typed_collection::<Test>().save(&test).await.unwrap();

    assert_eq!(store.opened_collections(), 1);

    let first = mapper.connection().collection_handle("Test").await;
    let second = mapper.connection().collection_handle("Test").await;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(store.opened_collections(), 1);
}

#[tokio::test]
async fn distinct_collections_get_distinct_handles() {
    let store = InMemoryStore::new();
    let mapper = DocumentMapper::new(store.clone());

    mapper.insert(&Test::named("foo")).await.unwrap();
    mapper
        .insert(&Profile { handle: "ada".into(), name: "Ada".into(), nickname: None })
        .await
        .unwrap();

    assert_eq!(store.opened_collections(), 2);
    assert_eq!(
        mapper.connection().cached_collections().await,
        vec!["Test".to_string(), "profiles".to_string()]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolution_opens_one_handle() {
    let store = InMemoryStore::new();
    let connection = Arc::new(Connection::new(store.clone()));

    let tasks = (0..16)
        .map(|_| {
            let connection = connection.clone();
            tokio::spawn(async move { connection.collection_handle("Fresh").await })
        })
        .collect::<Vec<_>>();

    let mut handles = Vec::new();
    for task in tasks {
        handles.push(task.await.unwrap());
    }

    assert_eq!(store.opened_collections(), 1);
    assert!(handles.iter().all(|handle| Arc::ptr_eq(handle, &handles[0])));
}

/// A store whose replaces never match, as if the document vanished after the existence check.
#[derive(Debug, Default)]
struct VanishingStore {
    inner: InMemoryStore,
}

#[derive(Debug)]
struct VanishingCollection(InMemoryCollection);

#[async_trait]
impl StoreBackend for VanishingStore {
    type Handle = VanishingCollection;

    fn open_collection(&self, name: &str) -> Self::Handle {
        VanishingCollection(self.inner.open_collection(name))
    }

    async fn ping(&self) -> DocumentMapperResult<()> {
        Ok(())
    }
}

#[async_trait]
impl CollectionHandle for VanishingCollection {
    fn name(&self) -> &str {
        self.0.name()
    }

    async fn insert_one(&self, document: Document) -> DocumentMapperResult<Bson> {
        self.0.insert_one(document).await
    }

    async fn find_one(&self, filter: Document) -> DocumentMapperResult<Option<Document>> {
        self.0.find_one(filter).await
    }

    async fn replace_one(&self, _: Document, _: Document) -> DocumentMapperResult<u64> {
        Ok(0)
    }

    async fn count_documents(&self, filter: Document) -> DocumentMapperResult<u64> {
        self.0.count_documents(filter).await
    }

    async fn delete_one(&self, filter: Document) -> DocumentMapperResult<u64> {
        self.0.delete_one(filter).await
    }

    async fn find_all(&self) -> DocumentMapperResult<Vec<Document>> {
        self.0.find_all().await
    }
}

#[tokio::test]
async fn save_reports_unmatched_replace() {
    let mapper = DocumentMapper::new(VanishingStore::default());

    let mut test = mapper.insert(&Test::named("foo")).await.unwrap().entity;
    test.name = "bar".into();

    let err = mapper.save(&test).await.unwrap_err();

    assert!(matches!(err, DocumentMapperError::NoDocumentModified(_, collection) if collection == "Test"));
}
