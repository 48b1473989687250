//! In-memory storage implementation for the document mapper.
//!
//! Documents are kept per collection in insertion order behind one async-safe read-write lock.
//! Collection handles share that lock, so every handle to the same collection sees the same data.

use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use mea::rwlock::RwLock;
use std::{
    collections::HashMap,
    iter,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tracing::trace;

use docmap_core::{
    backend::{CollectionHandle, StoreBackend, StoreBackendBuilder},
    document::KEY_FIELD,
    error::{DocumentMapperError, DocumentMapperResult},
};

use crate::evaluator::DocumentEvaluator;

type StoreMap = HashMap<String, Vec<Document>>;

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable; clones share the same underlying data and counters. Besides
/// storage it counts how many collection handles were opened, which makes handle reuse observable
/// in tests.
///
/// # Example
///
/// ```ignore
/// use docmap_memory::InMemoryStore;
/// use docmap::backend::{StoreBackend, CollectionHandle};
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let users = store.open_collection("users");
/// let id = users.insert_one(doc! { "name": "Alice" }).await?;
/// assert_eq!(users.count_documents(doc! { "_id": id }).await?, 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
    opened: Arc<AtomicUsize>,
    offline: bool,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Returns how many collection handles have been opened on this store.
    pub fn opened_collections(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Returns the number of documents in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    type Handle = InMemoryCollection;

    fn open_collection(&self, name: &str) -> Self::Handle {
        self.opened.fetch_add(1, Ordering::SeqCst);

        InMemoryCollection {
            name: name.to_string(),
            store: self.store.clone(),
        }
    }

    async fn ping(&self) -> DocumentMapperResult<()> {
        if self.offline {
            return Err(DocumentMapperError::Connection(
                "in-memory store is offline".into(),
            ));
        }

        Ok(())
    }
}

/// Handle to one collection of an [`InMemoryStore`].
#[derive(Debug)]
pub struct InMemoryCollection {
    name: String,
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryCollection {
    fn position(documents: &[Document], filter: &Document) -> Option<usize> {
        documents
            .iter()
            .position(|doc| DocumentEvaluator::new(doc).matches(filter))
    }
}

#[async_trait]
impl CollectionHandle for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, document: Document) -> DocumentMapperResult<Bson> {
        let mut store = self.store.write().await;
        let documents = store
            .entry(self.name.clone())
            .or_default();

        let (id, document) = match document.get(KEY_FIELD).cloned() {
            Some(id) => (id, document),
            None => {
                // Generated keys go first, as the server stores them
                let id = Bson::ObjectId(ObjectId::new());
                let stored = Document::from_iter(
                    iter::once((KEY_FIELD.to_string(), id.clone())).chain(document),
                );

                (id, stored)
            }
        };

        let mut filter = Document::new();
        filter.insert(KEY_FIELD, id.clone());

        if Self::position(documents, &filter).is_some() {
            return Err(DocumentMapperError::Backend(format!(
                "duplicate key {} in collection {}",
                id, self.name,
            )));
        }

        trace!(collection = %self.name, id = %id, "storing document");
        documents.push(document);

        Ok(id)
    }

    async fn find_one(&self, filter: Document) -> DocumentMapperResult<Option<Document>> {
        let store = self.store.read().await;

        Ok(store
            .get(&self.name)
            .and_then(|documents| {
                Self::position(documents, &filter).map(|index| documents[index].clone())
            }))
    }

    async fn replace_one(
        &self,
        filter: Document,
        replacement: Document,
    ) -> DocumentMapperResult<u64> {
        let mut store = self.store.write().await;
        let Some(documents) = store.get_mut(&self.name) else {
            return Ok(0);
        };
        let Some(index) = Self::position(documents, &filter) else {
            return Ok(0);
        };

        let current = documents[index].get(KEY_FIELD).cloned();
        let mut stored = Document::new();

        match (current, replacement.get(KEY_FIELD)) {
            (Some(current), Some(new)) if &current != new => {
                return Err(DocumentMapperError::Backend(format!(
                    "replacement would change immutable field {} from {} to {}",
                    KEY_FIELD, current, new,
                )));
            }
            (Some(current), _) => {
                stored.insert(KEY_FIELD, current);
            }
            (None, _) => {}
        }

        for (key, value) in replacement {
            if key != KEY_FIELD {
                stored.insert(key, value);
            }
        }
        documents[index] = stored;

        Ok(1)
    }

    async fn count_documents(&self, filter: Document) -> DocumentMapperResult<u64> {
        let store = self.store.read().await;

        Ok(store
            .get(&self.name)
            .map_or(0, |documents| {
                documents
                    .iter()
                    .filter(|doc| DocumentEvaluator::new(doc).matches(&filter))
                    .count() as u64
            }))
    }

    async fn delete_one(&self, filter: Document) -> DocumentMapperResult<u64> {
        let mut store = self.store.write().await;
        let Some(documents) = store.get_mut(&self.name) else {
            return Ok(0);
        };

        match Self::position(documents, &filter) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_all(&self) -> DocumentMapperResult<Vec<Document>> {
        Ok(self
            .store
            .read()
            .await
            .get(&self.name)
            .cloned()
            .unwrap_or_default())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use docmap_memory::InMemoryStore;
/// use docmap::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder().build().await.unwrap();
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder {
    offline: bool,
}

impl InMemoryStoreBuilder {
    /// Makes the built store fail its liveness check, to exercise connection failures.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> DocumentMapperResult<Self::Backend> {
        Ok(InMemoryStore {
            offline: self.offline,
            ..InMemoryStore::default()
        })
    }
}
