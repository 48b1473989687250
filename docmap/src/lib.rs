//! Main docmap crate: a thin generic CRUD layer between Rust records and document collections.
//!
//! This crate is the primary entry point for users of docmap. It re-exports the core types from
//! the sub-crates, the `Entity` derive macro, and the available storage backends.
//!
//! # Features
//!
//! - **One collection per type** - Entities are stored in a collection named after their type
//!   unless a name is given
//! - **Key by tag** - The primary key is the field tagged `_id`, found at compile time
//! - **Upsert** - `save` inserts new entities and fully replaces stored ones
//! - **Multiple backends** - In-memory for tests, MongoDB behind the `mongodb` feature
//!
//! # Quick Start
//!
//! ```ignore
//! use docmap::{prelude::*, memory::InMemoryStore};
//! use bson::oid::ObjectId;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Entity)]
//! pub struct Test {
//!     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
//!     pub id: Option<ObjectId>,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mapper = DocumentMapper::connect(InMemoryStore::builder()).await.unwrap();
//!
//!     // Insert, then change and save
//!     let mut test = mapper.insert(&Test { id: None, name: "foo".into() }).await.unwrap().entity;
//!     test.name = "bar".into();
//!     let test = mapper.save(&test).await.unwrap();
//!
//!     // Read every Test back
//!     println!("{:?}", mapper.find_all::<Test>().await.unwrap());
//!
//!     mapper.delete(&test).await.unwrap();
//!     mapper.shutdown().await.unwrap();
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - MongoDB backend (requires `mongodb` feature)

#[allow(unused_extern_crates)]
extern crate self as docmap;

pub mod prelude;

pub use docmap_core::{
    backend, collection, config, connection, document, error, locator, mapper, resolver,
};
pub use docmap_macros::Entity;

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docmap_memory::{InMemoryCollection, InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use docmap_mongodb::{MongoDbCollection, MongoDbStore, MongoDbStoreBuilder};
}
