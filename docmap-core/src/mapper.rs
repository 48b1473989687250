//! The generic document mapper.
//!
//! [`DocumentMapper`] turns entities into documents and back, on top of the per-collection
//! primitives of a [`StoreBackend`]. Every operation comes in two forms: one that stores the entity in
//! its type's default collection (see [`Entity::collection_name`]) and one that takes an explicit
//! collection name.
//!
//! # Example
//!
//! ```ignore
//! let mapper = DocumentMapper::connect(MongoDbStore::builder(ClientConfig::new("test"))).await?;
//!
//! let inserted = mapper.insert(&Test { id: None, name: "foo".into() }).await?;
//! let mut test = inserted.entity;
//!
//! test.name = "bar".into();
//! let test = mapper.save(&test).await?;
//!
//! mapper.delete(&test).await?;
//! assert!(mapper.find_by_id::<Test, _>(inserted.id).await.unwrap_err().is_not_found());
//! ```

use bson::{Bson, Document, doc, oid::ObjectId};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::{
    backend::{CollectionHandle, StoreBackend, StoreBackendBuilder},
    collection::TypedCollection,
    connection::Connection,
    document::{Entity, EntityExt, KEY_FIELD, KeyState},
    error::{DocumentMapperError, DocumentMapperResult},
    locator::find_field_by_tag,
    resolver::default_collection_name,
};

/// The outcome of an insert: the stored identifier and the entity as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Inserted<E> {
    pub id: Bson,
    pub entity: E,
}

/// CRUD operations for arbitrary entities over one connection.
#[derive(Debug)]
pub struct DocumentMapper<B: StoreBackend> {
    connection: Connection<B>,
}

impl<B: StoreBackend> DocumentMapper<B> {
    /// Creates a mapper over an already connected backend.
    pub fn new(backend: B) -> Self {
        Self::from_connection(Connection::new(backend))
    }

    pub fn from_connection(connection: Connection<B>) -> Self {
        Self { connection }
    }

    /// Connects the backend built by `builder` and checks that it answers.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentMapperError::Connection`] on network or authentication failure, or if the
    /// liveness check fails.
    pub async fn connect<T>(builder: T) -> DocumentMapperResult<Self>
    where
        T: StoreBackendBuilder<Backend = B>,
    {
        Ok(Self::from_connection(Connection::connect(builder).await?))
    }

    pub fn connection(&self) -> &Connection<B> {
        &self.connection
    }

    /// Gets a typed collection for `E` in its default collection.
    pub fn typed_collection<E: Entity>(&self) -> TypedCollection<'_, B, E> {
        TypedCollection::new(E::collection_name().to_string(), self)
    }

    /// Gets a typed collection for `E` in the collection `name`.
    pub fn typed_collection_named<E: Entity>(&self, name: &str) -> TypedCollection<'_, B, E> {
        TypedCollection::new(name.to_string(), self)
    }

    /// Inserts `entity` into its default collection.
    ///
    /// See [`DocumentMapper::insert_into`].
    pub async fn insert<E: Entity>(&self, entity: &E) -> DocumentMapperResult<Inserted<E>> {
        self.insert_into(entity, E::collection_name()).await
    }

    /// Inserts `entity` into `collection` and reads it back.
    ///
    /// An unset key is left out of the stored document so the store generates one.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentMapperError::InvalidArgument`] if the entity is not a document or its key
    /// is unset and cannot hold a generated `ObjectId`. Nothing is written in either case.
    /// Returns [`DocumentMapperError::NotFound`] if the read-back finds nothing, or the store's
    /// error.
    pub async fn insert_into<E: Entity>(
        &self,
        entity: &E,
        collection: &str,
    ) -> DocumentMapperResult<Inserted<E>> {
        let mut document = entity.to_document()?;
        if strip_unset_key(&mut document) {
            check_generated_key::<E>(&document)?;
        }

        let handle = self.handle(collection).await;
        let id = handle.insert_one(document).await?;

        debug!(collection, id = %id, "inserted document");

        let entity = self.read_back(&*handle, &id).await?;

        Ok(Inserted { id, entity })
    }

    /// Finds the entity with key `id` in `E`'s default collection.
    ///
    /// See [`DocumentMapper::find_by_id_in`].
    pub async fn find_by_id<E, I>(&self, id: I) -> DocumentMapperResult<E>
    where
        E: Entity,
        I: Into<Bson>,
    {
        self.find_by_id_in(id, E::collection_name()).await
    }

    /// Finds the entity with key `id` in `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentMapperError::NotFound`] if no document has that key, or a serialization
    /// error if the document does not decode into `E`.
    pub async fn find_by_id_in<E, I>(&self, id: I, collection: &str) -> DocumentMapperResult<E>
    where
        E: Entity,
        I: Into<Bson>,
    {
        let handle = self.handle(collection).await;

        self.read_back(&*handle, &id.into()).await
    }

    /// Checks whether `entity` is stored in its default collection.
    ///
    /// See [`DocumentMapper::exists_in`].
    pub async fn exists<E: Entity>(&self, entity: &E) -> DocumentMapperResult<bool> {
        self.exists_in(entity, E::collection_name()).await
    }

    /// Checks whether a document with `entity`'s key is stored in `collection`.
    ///
    /// An entity whose key is unset is never stored and is answered without a round trip.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentMapperError::MissingKeyField`] if `E` has no key field.
    pub async fn exists_in<E: Entity>(
        &self,
        entity: &E,
        collection: &str,
    ) -> DocumentMapperResult<bool> {
        match entity.key() {
            KeyState::Absent => Err(missing_key::<E>()),
            KeyState::Unset => Ok(false),
            KeyState::Set(id) => {
                let handle = self.handle(collection).await;

                Ok(handle.count_documents(key_filter(&id)).await? >= 1)
            }
        }
    }

    /// Saves `entity` to its default collection.
    ///
    /// See [`DocumentMapper::save_to`].
    pub async fn save<E: Entity>(&self, entity: &E) -> DocumentMapperResult<E> {
        self.save_to(entity, E::collection_name()).await
    }

    /// Inserts `entity` into `collection` if it is not stored yet, otherwise replaces the stored
    /// document with it. Returns the entity as read back from the store.
    ///
    /// The replace is a full replace: fields missing from `entity` are removed from the document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentMapperError::MissingKeyField`] if `E` has no key field, or
    /// [`DocumentMapperError::NoDocumentModified`] if the document disappeared between the
    /// existence check and the replace.
    pub async fn save_to<E: Entity>(&self, entity: &E, collection: &str) -> DocumentMapperResult<E> {
        let id = match entity.key() {
            KeyState::Absent => return Err(missing_key::<E>()),
            KeyState::Unset => {
                trace!(collection, "key unset, inserting");
                return Ok(self.insert_into(entity, collection).await?.entity);
            }
            KeyState::Set(id) => id,
        };

        if !self.exists_in(entity, collection).await? {
            trace!(collection, id = %id, "key not stored, inserting");
            return Ok(self.insert_into(entity, collection).await?.entity);
        }

        let handle = self.handle(collection).await;
        let matched = handle
            .replace_one(key_filter(&id), entity.to_document()?)
            .await?;

        if matched == 0 {
            return Err(DocumentMapperError::NoDocumentModified(
                id.to_string(),
                collection.to_string(),
            ));
        }

        debug!(collection, id = %id, "replaced document");

        self.read_back(&*handle, &id).await
    }

    /// Deletes `entity` from its default collection.
    ///
    /// See [`DocumentMapper::delete_from`].
    pub async fn delete<E: Entity>(&self, entity: &E) -> DocumentMapperResult<()> {
        self.delete_from(entity, E::collection_name()).await
    }

    /// Deletes the document with `entity`'s key from `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentMapperError::MissingKeyField`] if `E` has no key field, or
    /// [`DocumentMapperError::NotFound`] if the key is unset or no document was removed.
    pub async fn delete_from<E: Entity>(
        &self,
        entity: &E,
        collection: &str,
    ) -> DocumentMapperResult<()> {
        let id = match entity.key() {
            KeyState::Absent => return Err(missing_key::<E>()),
            KeyState::Unset => {
                return Err(DocumentMapperError::NotFound(
                    Bson::Null.to_string(),
                    collection.to_string(),
                ));
            }
            KeyState::Set(id) => id,
        };

        let handle = self.handle(collection).await;

        if handle.delete_one(key_filter(&id)).await? == 0 {
            return Err(DocumentMapperError::NotFound(
                id.to_string(),
                collection.to_string(),
            ));
        }

        debug!(collection, id = %id, "deleted document");

        Ok(())
    }

    /// Returns every entity in `E`'s default collection.
    pub async fn find_all<E: Entity>(&self) -> DocumentMapperResult<Vec<E>> {
        self.find_all_in(E::collection_name()).await
    }

    /// Returns every entity in `collection`, in store order.
    pub async fn find_all_in<E: Entity>(&self, collection: &str) -> DocumentMapperResult<Vec<E>> {
        self.handle(collection)
            .await
            .find_all()
            .await?
            .into_iter()
            .map(E::from_document)
            .collect()
    }

    /// Shuts down the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to shut down.
    pub async fn shutdown(self) -> DocumentMapperResult<()> {
        self.connection.shutdown().await
    }

    async fn handle(&self, collection: &str) -> Arc<B::Handle> {
        self.connection.collection_handle(collection).await
    }

    async fn read_back<E: Entity>(
        &self,
        handle: &B::Handle,
        id: &Bson,
    ) -> DocumentMapperResult<E> {
        match handle.find_one(key_filter(id)).await? {
            Some(document) => E::from_document(document),
            None => Err(DocumentMapperError::NotFound(
                id.to_string(),
                handle.name().to_string(),
            )),
        }
    }
}

fn key_filter(id: &Bson) -> Document {
    doc! { KEY_FIELD: id.clone() }
}

fn missing_key<E: Entity>() -> DocumentMapperError {
    DocumentMapperError::MissingKeyField(default_collection_name::<E>().to_string())
}

/// Removes the key field from `document` if it holds no usable key. Returns whether it did.
fn strip_unset_key(document: &mut Document) -> bool {
    let unset = find_field_by_tag(document, KEY_FIELD)
        .filter(|(_, value)| !KeyState::from_bson((*value).clone()).is_set())
        .map(|(field, _)| field.to_string());

    match unset {
        Some(field) => document.remove(&field).is_some(),
        None => false,
    }
}

/// Fails if `E` could not be read back once the store fills in an `ObjectId` key.
fn check_generated_key<E: Entity>(document: &Document) -> DocumentMapperResult<()> {
    let mut generated = document.clone();
    generated.insert(KEY_FIELD, ObjectId::new());

    E::from_document(generated).map(|_| ()).map_err(|e| {
        DocumentMapperError::InvalidArgument(format!(
            "key of {} is unset and cannot hold a generated ObjectId: {}",
            default_collection_name::<E>(),
            e,
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_key() {
        let mut document = doc! { "_id": Bson::Null, "name": "foo" };

        assert!(strip_unset_key(&mut document));
        assert_eq!(document, doc! { "name": "foo" });
    }

    #[test]
    fn keeps_set_key() {
        let mut document = doc! { "_id": 0, "name": "foo" };

        assert!(!strip_unset_key(&mut document));

        assert_eq!(document, doc! { "_id": 0, "name": "foo" });
    }

    #[test]
    fn filter_addresses_key_field() {
        assert_eq!(key_filter(&Bson::Int32(3)), doc! { "_id": 3 });
    }
}
