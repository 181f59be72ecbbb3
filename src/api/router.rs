use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_book, delete_book, override_method, read_books, read_one_book, update_book,
};

/// Creates the router with all book management endpoints
///
/// - GET    /books      - List books with an empty registration form
/// - POST   /books      - Register a new book
/// - GET    /books/:id  - Show the edit form of a book
/// - PUT    /books/:id  - Update a book (optimistic lock on `version`)
/// - DELETE /books/:id  - Delete a book
/// - POST   /books/:id  - PUT / DELETE selected by `_method`
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/books", get(read_books).post(create_book))
        .route(
            "/books/:id",
            get(read_one_book)
                .put(update_book)
                .delete(delete_book)
                .post(override_method),
        )
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
