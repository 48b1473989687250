//! MongoDB backend implementation for docmap.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait on top of the
//! official async driver. Each collection handle wraps one driver collection of raw BSON documents.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! docmap = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The builder takes a [`ClientConfig`](docmap_core::config::ClientConfig) and connects to
//! `mongodb://{host}:{port}`. A full connection string can be supplied with
//! [`MongoDbStoreBuilder::with_dsn`].
//!
//! # Example
//!
//! ```ignore
//! use docmap::{prelude::*, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mapper = DocumentMapper::connect(MongoDbStore::builder(ClientConfig::new("test"))).await?;
//!
//!     mapper.shutdown().await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmap_mongodb;

pub mod store;

pub use store::{MongoDbCollection, MongoDbStore, MongoDbStoreBuilder};
