//! MongoDB-backed record store

use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Collection, Database, IndexModel,
};

use super::{RecordStore, StoreError, StoreResult};

/// Server error code for unique index violations
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Build a client for `url`. The driver connects lazily, so this only
    /// fails on a malformed URI; reachability is established by `ping`.
    pub async fn new(url: &str, fallback_database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(fallback_database));

        tracing::debug!("Using database {}", database.name());

        Ok(Self { database })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }
}

/// Codes of the per-document write errors carried by `kind`
fn write_error_codes(kind: &ErrorKind) -> Vec<i32> {
    match kind {
        ErrorKind::InsertMany(failure) => failure
            .write_errors
            .iter()
            .flatten()
            .map(|w| w.code)
            .collect(),
        ErrorKind::Write(WriteFailure::WriteError(w)) => vec![w.code],
        _ => Vec::new(),
    }
}

fn write_error(e: mongodb::error::Error) -> StoreError {
    let duplicate = write_error_codes(&e.kind).contains(&DUPLICATE_KEY_CODE);
    let message = e.to_string();
    if duplicate {
        StoreError::DuplicateKey(message)
    } else {
        StoreError::Backend(message)
    }
}

#[async_trait]
impl RecordStore for MongoStore {
    async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection(collection)
            .create_index(index)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> StoreResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        self.collection(collection)
            .insert_many(documents)
            .await
            .map_err(write_error)?;
        Ok(())
    }

    async fn find(&self, collection: &str, filter: Document) -> StoreResult<Vec<Document>> {
        self.collection(collection)
            .find(filter)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
