//! Runs insert, save, find-all and delete against a live MongoDB server.
//!
//! ```sh
//! DOCMAP_DATABASE=test RUST_LOG=debug cargo run -p docmap --example basic --features mongodb
//! ```

use docmap::{bson::oid::ObjectId, mongodb::MongoDbStore, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize, Entity)]
struct Test {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut config = ClientConfig::from_env();
    if config.database.is_empty() {
        config = config.with_database("test");
    }

    let mapper = DocumentMapper::connect(MongoDbStore::builder(config)).await?;

    let mut test = mapper.insert(&Test { id: None, name: "foo".into() }).await?.entity;
    info!(?test, "inserted");

    test.name = "bar".into();
    let test = mapper.save(&test).await?;
    info!(?test, "saved");

    for result in mapper.find_all::<Test>().await? {
        info!(?result, "found");
    }

    mapper.delete(&test).await?;
    info!("deleted");

    let id = test.id.ok_or("saved entity has no key")?;
    match mapper.find_by_id::<Test, _>(id).await {
        Err(err) if err.is_not_found() => info!(%err, "deleted document is gone"),
        Err(err) => return Err(err.into()),
        Ok(found) => error!(?found, "deleted document is still stored"),
    }

    mapper.shutdown().await?;

    Ok(())
}
