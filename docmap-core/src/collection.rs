//! Typed collections.
//!
//! A [`TypedCollection`] binds an entity type and a collection name to a mapper, so the CRUD
//! operations can be called without repeating either.
//!
//! # Example
//!
//! ```ignore
//! let tests = mapper.typed_collection::<Test>();
//! let inserted = tests.insert(&Test { id: None, name: "foo".into() }).await?;
//! assert!(tests.exists(&inserted.entity).await?);
//! ```

use bson::Bson;
use std::marker::PhantomData;

use crate::{
    backend::StoreBackend,
    document::Entity,
    error::DocumentMapperResult,
    mapper::{DocumentMapper, Inserted},
};

#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, E: Entity> {
    name: String,
    mapper: &'a DocumentMapper<B>,
    _marker: PhantomData<E>,
}

impl<'a, B: StoreBackend, E: Entity> TypedCollection<'a, B, E> {
    pub(crate) fn new(name: String, mapper: &'a DocumentMapper<B>) -> Self {
        Self { name, mapper, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Views the same collection as holding a different entity type.
    pub fn with_type<T: Entity>(&self) -> TypedCollection<'a, B, T> {
        TypedCollection {
            name: self.name.clone(),
            mapper: self.mapper,
            _marker: PhantomData,
        }
    }

    /// Inserts an entity and reads it back.
    ///
    /// # Errors
    ///
    /// See [`DocumentMapper::insert_into`].
    pub async fn insert(&self, entity: &E) -> DocumentMapperResult<Inserted<E>> {
        self.mapper.insert_into(entity, &self.name).await
    }

    /// Finds the entity with the given key.
    ///
    /// # Errors
    ///
    /// See [`DocumentMapper::find_by_id_in`].
    pub async fn find_by_id<I: Into<Bson>>(&self, id: I) -> DocumentMapperResult<E> {
        self.mapper.find_by_id_in(id, &self.name).await
    }

    /// Checks whether the entity is stored in this collection.
    ///
    /// # Errors
    ///
    /// See [`DocumentMapper::exists_in`].
    pub async fn exists(&self, entity: &E) -> DocumentMapperResult<bool> {
        self.mapper.exists_in(entity, &self.name).await
    }

    /// Inserts or fully replaces an entity.
    ///
    /// # Errors
    ///
    /// See [`DocumentMapper::save_to`].
    pub async fn save(&self, entity: &E) -> DocumentMapperResult<E> {
        self.mapper.save_to(entity, &self.name).await
    }

    /// Deletes the entity from this collection.
    ///
    /// # Errors
    ///
    /// See [`DocumentMapper::delete_from`].
    pub async fn delete(&self, entity: &E) -> DocumentMapperResult<()> {
        self.mapper.delete_from(entity, &self.name).await
    }

    /// Returns every entity in the collection.
    pub async fn find_all(&self) -> DocumentMapperResult<Vec<E>> {
        self.mapper.find_all_in(&self.name).await
    }
}
