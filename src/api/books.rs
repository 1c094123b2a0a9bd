//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppResult, MessageError},
    models::{
        book::{AvailableQuery, Book, CreateBook},
        Created, Submission,
    },
    AppState,
};

use super::JsonBody;

/// Book list wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

/// Create one book or a batch of books
#[utoipa::path(
    post,
    path = "/lms/books",
    tag = "books",
    request_body(content = CreateBook, description = "A book, or an array of books"),
    responses(
        (status = 201, description = "Created book(s)", body = Book),
        (status = 400, description = "Validation or uniqueness failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_books(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody,
) -> AppResult<(StatusCode, Json<Created<Book>>)> {
    let submission = Submission::<CreateBook>::parse(payload)?;
    let created = state.services.books.create(submission).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List all books
#[utoipa::path(
    get,
    path = "/lms/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = BooksResponse),
        (status = 500, description = "Store failure", body = crate::error::FailureResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<BooksResponse>> {
    let books = state.services.books.list().await?;
    Ok(Json(BooksResponse { books }))
}

/// List available books, optionally by genre and publication year
#[utoipa::path(
    get,
    path = "/lms/books/available",
    tag = "books",
    params(AvailableQuery),
    responses(
        (status = 200, description = "Available books", body = [Book]),
        (status = 500, description = "Store failure", body = crate::error::MessageResponse)
    )
)]
pub async fn list_available_books(
    State(state): State<AppState>,
    Query(query): Query<AvailableQuery>,
) -> Result<Json<Vec<Book>>, MessageError> {
    let books = state.services.books.available(&query).await?;
    Ok(Json(books))
}

/// List issued (unavailable) books
#[utoipa::path(
    get,
    path = "/lms/books/issued",
    tag = "books",
    responses(
        (status = 200, description = "Issued books", body = BooksResponse),
        (status = 500, description = "Store failure", body = crate::error::FailureResponse)
    )
)]
pub async fn list_issued_books(State(state): State<AppState>) -> AppResult<Json<BooksResponse>> {
    let books = state.services.books.issued().await?;
    Ok(Json(BooksResponse { books }))
}

/// List books of one genre
#[utoipa::path(
    get,
    path = "/lms/books/genre/{type}",
    tag = "books",
    params(("type" = String, Path, description = "Genre name")),
    responses(
        (status = 200, description = "Books of the genre", body = BooksResponse),
        (status = 500, description = "Store failure", body = crate::error::FailureResponse)
    )
)]
pub async fn list_books_by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
) -> AppResult<Json<BooksResponse>> {
    let books = state.services.books.by_genre(&genre).await?;
    Ok(Json(BooksResponse { books }))
}
