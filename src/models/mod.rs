//! Data models for the rental ledger

pub mod book;
pub mod rental;
pub mod report;
pub mod user;
pub mod wishlist;

// Re-export commonly used types
pub use book::{Book, BookShort};
pub use rental::{Rental, RentalDetails};
pub use report::RentalReport;
pub use user::User;
pub use wishlist::{WishlistEntry, WishlistItem};
