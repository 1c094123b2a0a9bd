//! Book domain methods on Repository

use bson::{oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{stored_time, Repository, BOOK_COLLECTION};
use crate::{
    error::AppResult,
    models::{book::{Book, BookFilter, CreateBook}, Genre},
    store::StoreError,
};

/// On-disk shape of a book
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(rename = "bookID")]
    book_id: i64,
    title: String,
    author: String,
    genre: Genre,
    published_year: i32,
    is_available: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl From<CreateBook> for BookDocument {
    fn from(data: CreateBook) -> Self {
        Self {
            id: ObjectId::new(),
            book_id: data.book_id,
            title: data.title,
            author: data.author,
            genre: data.genre,
            published_year: data.published_year,
            is_available: data.is_available.unwrap_or(true),
            created_at: stored_time(data.created_at),
        }
    }
}

impl From<BookDocument> for Book {
    fn from(doc: BookDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            book_id: doc.book_id,
            title: doc.title,
            author: doc.author,
            genre: doc.genre,
            published_year: doc.published_year,
            is_available: doc.is_available,
            created_at: doc.created_at,
        }
    }
}

impl BookFilter {
    fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(available) = self.is_available {
            filter.insert("isAvailable", available);
        }
        if let Some(ref genre) = self.genre {
            filter.insert("genre", genre.as_str());
        }
        if let Some(year) = self.published_year {
            // Integral years match the stored Int32 directly
            if year.fract() == 0.0 && year >= f64::from(i32::MIN) && year <= f64::from(i32::MAX) {
                filter.insert("publishedYear", year as i32);
            } else {
                filter.insert("publishedYear", year);
            }
        }
        filter
    }
}

impl Repository {
    /// Insert books in order, returning them as stored
    pub async fn books_create(&self, data: Vec<CreateBook>) -> AppResult<Vec<Book>> {
        let records: Vec<BookDocument> = data.into_iter().map(BookDocument::from).collect();
        let documents = records
            .iter()
            .map(bson::to_document)
            .collect::<Result<Vec<Document>, _>>()
            .map_err(StoreError::from)?;

        self.store.insert_many(BOOK_COLLECTION, documents).await?;

        Ok(records.into_iter().map(Book::from).collect())
    }

    /// Find books matching a filter
    pub async fn books_find(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let documents = self.store.find(BOOK_COLLECTION, filter.to_document()).await?;
        let books = documents
            .into_iter()
            .map(|d| bson::from_document::<BookDocument>(d).map(Book::from))
            .collect::<Result<Vec<Book>, _>>()
            .map_err(StoreError::from)?;
        Ok(books)
    }

    /// List all books
    pub async fn books_list(&self) -> AppResult<Vec<Book>> {
        self.books_find(&BookFilter::default()).await
    }
}
