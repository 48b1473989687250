use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::{Client, Collection as MongoCollection, Database, options::ClientOptions};
use tracing::info;

use docmap_core::{
    backend::{CollectionHandle, StoreBackend, StoreBackendBuilder},
    config::ClientConfig,
    error::{DocumentMapperError, DocumentMapperResult},
};

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: Database,
}

impl MongoDbStore {
    pub fn new(client: Client, database: &str) -> Self {
        let database = client.database(database);

        Self { client, database }
    }

    pub fn builder(config: ClientConfig) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(config)
    }

    /// Returns the name of the selected database.
    pub fn database_name(&self) -> &str {
        self.database.name()
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    type Handle = MongoDbCollection;

    fn open_collection(&self, name: &str) -> Self::Handle {
        MongoDbCollection {
            name: name.to_string(),
            inner: self.database.collection(name),
        }
    }

    async fn ping(&self) -> DocumentMapperResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| DocumentMapperError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn shutdown(self) -> DocumentMapperResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[derive(Debug)]
pub struct MongoDbCollection {
    name: String,
    inner: MongoCollection<Document>,
}

#[async_trait]
impl CollectionHandle for MongoDbCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, document: Document) -> DocumentMapperResult<Bson> {
        Ok(self.inner
            .insert_one(document)
            .await
            .map_err(|e| DocumentMapperError::Backend(e.to_string()))?
            .inserted_id)
    }

    async fn find_one(&self, filter: Document) -> DocumentMapperResult<Option<Document>> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| DocumentMapperError::Backend(e.to_string()))
    }

    async fn replace_one(&self, filter: Document, replacement: Document) -> DocumentMapperResult<u64> {
        Ok(self.inner
            .replace_one(filter, replacement)
            .await
            .map_err(|e| DocumentMapperError::Backend(e.to_string()))?
            .matched_count)
    }

    async fn count_documents(&self, filter: Document) -> DocumentMapperResult<u64> {
        self.inner
            .count_documents(filter)
            .await
            .map_err(|e| DocumentMapperError::Backend(e.to_string()))
    }

    async fn delete_one(&self, filter: Document) -> DocumentMapperResult<u64> {
        Ok(self.inner
            .delete_one(filter)
            .await
            .map_err(|e| DocumentMapperError::Backend(e.to_string()))?
            .deleted_count)
    }

    async fn find_all(&self) -> DocumentMapperResult<Vec<Document>> {
        self.inner
            .find(doc! {})
            .await
            .map_err(|e| DocumentMapperError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| DocumentMapperError::Backend(e.to_string()))
    }
}

pub struct MongoDbStoreBuilder {
    config: ClientConfig,
    dsn: Option<String>,
}

impl MongoDbStoreBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self { config, dsn: None }
    }

    /// Connects with a full connection string instead of the configured host and port.
    ///
    /// Use this when the server needs credentials or options beyond `mongodb://{host}:{port}`.
    pub fn with_dsn(mut self, dsn: &str) -> Self {
        self.dsn = Some(dsn.to_string());
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentMapperResult<Self::Backend> {
        self.config.validate()?;

        let dsn = self.dsn.unwrap_or_else(|| self.config.url());

        info!(
            host = %self.config.host,
            port = %self.config.port,
            database = %self.config.database,
            "connecting to MongoDB",
        );

        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&dsn)
                    .await
                    .map_err(|e| DocumentMapperError::Connection(e.to_string()))?,
            )
            .map_err(|e| DocumentMapperError::Connection(e.to_string()))?,
            &self.config.database,
        ))
    }
}
