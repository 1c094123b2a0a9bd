//! Document store access and connection supervision

pub mod connector;
pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use bson::Document;
use thiserror::Error;

pub use connector::{ConnectionMonitor, ConnectionState, Connector};
pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Connection(String),

    /// A unique index rejected the write
    #[error("{0}")]
    DuplicateKey(String),

    #[error("{0}")]
    Backend(String),

    #[error("{0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<bson::de::Error> for StoreError {
    fn from(err: bson::de::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Collection-addressed document store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Probe the server, succeeding only if it answers
    async fn ping(&self) -> StoreResult<()>;

    /// Declare `field` unique within `collection`
    async fn ensure_unique_index(&self, collection: &str, field: &str) -> StoreResult<()>;

    /// Ordered insert: stops at the first failing document, earlier ones stay written
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> StoreResult<()>;

    /// Documents matching `filter`, in insertion order
    async fn find(&self, collection: &str, filter: Document) -> StoreResult<Vec<Document>>;
}
