//! Rental Ledger
//!
//! Keeps track of books, users, wishlists and rentals. A book's availability
//! flag always agrees with its open rental, wishlisting users are notified
//! when a book frees up, and every change leaves a plain-text audit trail.

use std::sync::Arc;

pub mod api;
pub mod audit;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
