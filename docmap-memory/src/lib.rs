//! In-memory document storage backend for docmap.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait. It is
//! meant for tests and local development: it keeps everything in process memory and counts the
//! collection handles it opens so that handle caching can be observed.
//!
//! # Quick Start
//!
//! ```ignore
//! use docmap::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mapper = DocumentMapper::connect(InMemoryStore::builder()).await?;
//!     let inserted = mapper.insert(&Test { id: None, name: "foo".into() }).await?;
//!
//!     println!("{:?}", inserted.entity);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmap_memory;

pub mod store;
mod evaluator;

pub use store::{InMemoryCollection, InMemoryStore, InMemoryStoreBuilder};
