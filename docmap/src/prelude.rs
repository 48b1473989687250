//! Convenient re-exports of commonly used types from docmap.
//!
//! ```ignore
//! use docmap::prelude::*;
//! ```

pub use docmap_core::{
    backend::{CollectionHandle, StoreBackend, StoreBackendBuilder},
    collection::TypedCollection,
    config::ClientConfig,
    connection::Connection,
    document::{Entity, EntityExt, KeyState, KeyValue},
    error::{DocumentMapperError, DocumentMapperResult},
    mapper::{DocumentMapper, Inserted},
};
pub use docmap_macros::Entity;
