//! Repository layer for document store operations

pub mod books;
pub mod members;

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};

use crate::{error::AppResult, store::RecordStore};

pub const BOOK_COLLECTION: &str = "book";
pub const MEMBER_COLLECTION: &str = "member";

/// Main repository struct holding the store handle
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn RecordStore>,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create the unique indexes backing `bookID`, `memberID` and `email`
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.store.ensure_unique_index(BOOK_COLLECTION, "bookID").await?;
        self.store.ensure_unique_index(MEMBER_COLLECTION, "memberID").await?;
        self.store.ensure_unique_index(MEMBER_COLLECTION, "email").await?;
        tracing::info!("Unique indexes ensured");
        Ok(())
    }
}

/// Timestamps are stored with millisecond precision
fn stored_time(time: Option<DateTime<Utc>>) -> DateTime<Utc> {
    time.unwrap_or_else(Utc::now).trunc_subsecs(3)
}
