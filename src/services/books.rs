//! Book service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{AvailableQuery, Book, BookFilter, CreateBook},
        Created, Submission,
    },
    repository::Repository,
    store::StoreError,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Persist one book or a validated batch, in order
    pub async fn create(&self, submission: Submission<CreateBook>) -> AppResult<Created<Book>> {
        let batch = submission.is_batch();
        let books = self.repository.books_create(submission.into_records()).await?;
        tracing::info!(count = books.len(), batch, "Books created");

        Created::shaped(batch, books)
            .ok_or_else(|| AppError::Store(StoreError::Backend("no book was stored".to_string())))
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books_list().await
    }

    /// Available books, optionally narrowed by genre and publication year
    pub async fn available(&self, query: &AvailableQuery) -> AppResult<Vec<Book>> {
        let filter = BookFilter::available(query)?;
        self.repository.books_find(&filter).await
    }

    pub async fn issued(&self) -> AppResult<Vec<Book>> {
        self.repository.books_find(&BookFilter::issued()).await
    }

    pub async fn by_genre(&self, genre: &str) -> AppResult<Vec<Book>> {
        self.repository.books_find(&BookFilter::genre(genre)).await
    }
}
