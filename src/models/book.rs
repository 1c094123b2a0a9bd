//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::Genre;
use crate::error::{AppError, AppResult};

/// Stored book record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Store identity (hex ObjectId)
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "bookID")]
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub published_year: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    /// Unique book number
    #[serde(rename = "bookID")]
    pub book_id: i64,
    #[validate(length(min = 1, max = 200, message = "Title is required and must be at most 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub genre: Genre,
    #[validate(range(min = 1900, message = "Books published before 1900 are not allowed"))]
    pub published_year: i32,
    /// Defaults to true
    pub is_available: Option<bool>,
    /// Defaults to the creation time
    pub created_at: Option<DateTime<Utc>>,
}

/// Query parameters of `GET /lms/books/available`
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct AvailableQuery {
    /// Exact genre
    pub genre: Option<String>,
    /// Exact publication year
    pub published_year: Option<String>,
}

/// Book selection criteria; unset fields do not constrain
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookFilter {
    pub is_available: Option<bool>,
    pub genre: Option<String>,
    pub published_year: Option<f64>,
}

impl BookFilter {
    pub fn available(query: &AvailableQuery) -> AppResult<Self> {
        let genre = query.genre.clone().filter(|g| !g.is_empty());

        let published_year = match query.published_year.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(to_number(raw).ok_or_else(|| {
                AppError::Query(format!(
                    "Cast to Number failed for value \"{}\" (type string) at path \"publishedYear\" for model \"book\"",
                    raw
                ))
            })?),
        };

        Ok(Self {
            is_available: Some(true),
            genre,
            published_year,
        })
    }

    pub fn issued() -> Self {
        Self {
            is_available: Some(false),
            ..Default::default()
        }
    }

    pub fn genre(genre: &str) -> Self {
        Self {
            genre: Some(genre.to_string()),
            ..Default::default()
        }
    }
}

/// Numeric reading of a query value: surrounding whitespace is ignored and
/// a blank value reads as zero. Non-finite values are rejected.
fn to_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
