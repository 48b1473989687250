//! Connection management and the per-collection handle cache.
//!
//! A [`Connection`] owns one connected [`StoreBackend`] and lazily opens one
//! [`CollectionHandle`](crate::backend::CollectionHandle) per collection name. Handles are cached for
//! the lifetime of the connection and shared as `Arc`s.

use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, info};

use crate::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentMapperError, DocumentMapperResult},
};

type HandleMap<H> = HashMap<String, Arc<H>>;

/// One connected backend plus its cache of collection handles.
///
/// # Thread Safety
///
/// The handle cache sits behind an async read-write lock. Concurrent lookups of a name that is not
/// cached yet open exactly one handle: the first writer inserts it and every other caller reuses it.
#[derive(Debug)]
pub struct Connection<B: StoreBackend> {
    backend: B,
    handles: RwLock<HandleMap<B::Handle>>,
}

impl<B: StoreBackend> Connection<B> {
    /// Wraps an already connected backend without checking liveness.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handles: RwLock::new(HandleMap::new()),
        }
    }

    /// Builds the backend and checks that the store answers a ping.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentMapperError::Connection`] if the backend cannot be built or the liveness
    /// check fails.
    pub async fn connect<T>(builder: T) -> DocumentMapperResult<Self>
    where
        T: StoreBackendBuilder<Backend = B>,
    {
        let backend = builder.build().await?;

        backend
            .ping()
            .await
            .map_err(|e| match e {
                DocumentMapperError::Connection(_) => e,
                other => DocumentMapperError::Connection(other.to_string()),
            })?;

        info!(backend = ?backend, "connected to document store");

        Ok(Self::new(backend))
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the handle for `name`, opening and caching it on first use.
    pub async fn collection_handle(&self, name: &str) -> Arc<B::Handle> {
        if let Some(handle) = self.handles.read().await.get(name) {
            return handle.clone();
        }

        self.handles
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(collection = name, "opening collection handle");
                Arc::new(self.backend.open_collection(name))
            })
            .clone()
    }

    /// Lists the names of all cached collection handles.
    pub async fn cached_collections(&self) -> Vec<String> {
        let mut names = self
            .handles
            .read()
            .await
            .keys()
            .cloned()
            .collect::<Vec<_>>();

        names.sort();
        names
    }

    /// Drops all cached handles and shuts down the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to shut down.
    pub async fn shutdown(self) -> DocumentMapperResult<()> {
        let Self { backend, handles } = self;

        drop(handles);
        backend.shutdown().await?;

        info!("document store connection closed");

        Ok(())
    }
}
