//! Storage backend abstraction for the document mapper.
//!
//! The mapper depends on a very small slice of a document store driver, split over two traits
//! and a factory:
//!
//! - [`StoreBackend`]: one connected client plus its selected database. Opens collection handles,
//!   answers liveness checks and shuts down.
//! - [`CollectionHandle`]: the per-collection primitives the mapper is built from.
//! - [`StoreBackendBuilder`]: factory trait for connecting a backend.
//!
//! All filters passed to handles are plain BSON documents of the form `{ "_id": <key> }` or `{}`.
//!
//! # Examples
//!
//! ```ignore
//! use docmap::backend::{StoreBackend, CollectionHandle};
//! use bson::doc;
//!
//! let users = backend.open_collection("users");
//! let id = users.insert_one(doc! { "name": "Alice" }).await?;
//! let found = users.find_one(doc! { "_id": id }).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Bson, Document};
use std::fmt::Debug;

use crate::error::DocumentMapperResult;

/// Abstract interface for the driver of one connected database.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the connection manager shares one backend across all
/// concurrent operations.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// The collection handle type this backend opens.
    type Handle: CollectionHandle + 'static;

    /// Opens a handle to the named collection.
    ///
    /// Opening is cheap and does not touch the network. The connection manager caches the returned
    /// handle, so this is called at most once per name per connection.
    fn open_collection(&self, name: &str) -> Self::Handle;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentMapperError::Connection`](crate::error::DocumentMapperError::Connection)
    /// if the store does not answer.
    async fn ping(&self) -> DocumentMapperResult<()>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op; backends holding network connections should override
    /// it.
    async fn shutdown(self) -> DocumentMapperResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// The per-collection primitives the mapper consumes.
///
/// Each method is a single round trip to the store.
#[async_trait]
pub trait CollectionHandle: Send + Sync + Debug {
    /// Returns the name of the collection this handle addresses.
    fn name(&self) -> &str;

    /// Inserts one document and returns its identifier.
    ///
    /// If the document carries no `_id`, the store generates one.
    async fn insert_one(&self, document: Document) -> DocumentMapperResult<Bson>;

    /// Returns the first document matching `filter`, or `None`.
    async fn find_one(&self, filter: Document) -> DocumentMapperResult<Option<Document>>;

    /// Replaces the first document matching `filter` and returns the number of matched documents.
    async fn replace_one(
        &self,
        filter: Document,
        replacement: Document,
    ) -> DocumentMapperResult<u64>;

    /// Counts the documents matching `filter`.
    async fn count_documents(&self, filter: Document) -> DocumentMapperResult<u64>;

    /// Deletes the first document matching `filter` and returns the number of deleted documents.
    async fn delete_one(&self, filter: Document) -> DocumentMapperResult<u64>;

    /// Returns every document in the collection, in store order.
    async fn find_all(&self) -> DocumentMapperResult<Vec<Document>>;
}

/// Factory for connecting a [`StoreBackend`].
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    /// Connects the backend.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentMapperError::Connection`](crate::error::DocumentMapperError::Connection)
    /// if the client cannot be created.
    async fn build(self) -> DocumentMapperResult<Self::Backend>;
}
