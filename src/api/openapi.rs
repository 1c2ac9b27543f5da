//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, rentals, reports, users, wishlist, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rental Ledger API",
        version = "0.1.0",
        description = "Book rentals, wishlists and availability"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        health::health_check,
        books::list_books,
        books::search_books,
        books::get_book,
        books::create_book,
        books::delete_book,
        books::update_availability,
        users::list_users,
        users::get_user,
        users::create_user,
        users::delete_user,
        wishlist::add_to_wishlist,
        wishlist::get_wishlist,
        wishlist::remove_from_wishlist,
        rentals::create_rental,
        rentals::get_rental,
        rentals::return_rental,
        rentals::get_user_rentals,
        reports::rental_report,
    ),
    components(
        schemas(
            health::HealthResponse,
            MessageResponse,
            crate::error::ErrorResponse,
            crate::error::SideEffectWarning,
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookQuery,
            crate::models::book::CreateBook,
            crate::models::book::AvailabilityUpdate,
            books::AvailabilityResponse,
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::wishlist::WishlistItem,
            crate::models::rental::Rental,
            crate::models::rental::CreateRental,
            crate::models::rental::ReturnConfirmation,
            rentals::RentalResponse,
            rentals::ReturnResponse,
            crate::models::report::RentalReport,
            reports::ReportResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "books", description = "Catalog and availability"),
        (name = "users", description = "User management"),
        (name = "wishlist", description = "Wishlists"),
        (name = "rentals", description = "Rentals and returns"),
        (name = "reports", description = "Rental reporting")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
