//! API handlers for LMS REST endpoints

pub mod books;
pub mod health;
pub mod members;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// Extractor for a raw JSON body; a malformed body is a client error
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let lms = Router::new()
        // Books
        .route("/books", get(books::list_books).post(books::create_books))
        .route("/books/available", get(books::list_available_books))
        .route("/books/issued", get(books::list_issued_books))
        .route("/books/genre/:type", get(books::list_books_by_genre))
        // Members
        .route("/members", get(members::list_members).post(members::create_members))
        .route("/members/recent", get(members::list_recent_members))
        .route("/members/role/:role", get(members::list_members_by_role));

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/lms", lms)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
