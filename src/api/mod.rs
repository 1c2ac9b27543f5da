//! API handlers for the rental ledger REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod rentals;
pub mod reports;
pub mod users;
pub mod wishlist;

use axum::{
    extract::FromRequest,
    routing::{get, patch, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, AppState};

/// JSON request body whose rejections use the regular error envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Plain confirmation message
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/search", get(books::search_books))
        .route("/books/:id", get(books::get_book).delete(books::delete_book))
        .route("/books/:id/availability", patch(books::update_availability))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", get(users::get_user).delete(users::delete_user))
        .route("/users/:id/rentals", get(rentals::get_user_rentals))
        // Wishlist
        .route("/wishlist/:user_id", get(wishlist::get_wishlist))
        .route(
            "/wishlist/:user_id/:book_id",
            post(wishlist::add_to_wishlist).delete(wishlist::remove_from_wishlist),
        )
        // Rentals
        .route("/rentals", post(rentals::create_rental))
        .route("/rentals/:id", get(rentals::get_rental))
        .route("/rentals/:id/return", patch(rentals::return_rental))
        // Report
        .route("/rental-report", get(reports::rental_report))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
