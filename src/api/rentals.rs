//! Rental endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::JsonBody;
use crate::{
    error::{AppResult, SideEffectWarning},
    models::rental::{CreateRental, Rental, ReturnConfirmation},
    AppState,
};

/// Newly created rental
#[derive(Serialize, ToSchema)]
pub struct RentalResponse {
    #[serde(flatten)]
    pub rental: Rental,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SideEffectWarning>,
}

/// Return confirmation
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub message: String,
    pub rental: ReturnConfirmation,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SideEffectWarning>,
}

/// Rent a book
#[utoipa::path(
    post,
    path = "/rentals",
    tag = "rentals",
    request_body = CreateRental,
    responses(
        (status = 201, description = "Rental created", body = RentalResponse),
        (status = 404, description = "Book or user not found"),
        (status = 409, description = "Book is already rented")
    )
)]
pub async fn create_rental(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateRental>,
) -> AppResult<(StatusCode, Json<RentalResponse>)> {
    let outcome = state
        .services
        .rentals
        .create_rental(request.book_id, request.user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RentalResponse {
            rental: outcome.value,
            warnings: outcome.warnings,
        }),
    ))
}

/// Get a rental by ID
#[utoipa::path(
    get,
    path = "/rentals/{id}",
    tag = "rentals",
    params(
        ("id" = i64, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Rental", body = Rental),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn get_rental(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Rental>> {
    let rental = state.services.rentals.get_rental(id).await?;
    Ok(Json(rental))
}

/// Return a rented book
#[utoipa::path(
    patch,
    path = "/rentals/{id}/return",
    tag = "rentals",
    params(
        ("id" = i64, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Rental or renter not found"),
        (status = 409, description = "Book already returned")
    )
)]
pub async fn return_rental(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ReturnResponse>> {
    let outcome = state.services.rentals.return_rental(id).await?;

    Ok(Json(ReturnResponse {
        message: outcome.value.message(),
        rental: outcome.value,
        warnings: outcome.warnings,
    }))
}

/// Get a user's rentals, open ones first
#[utoipa::path(
    get,
    path = "/users/{id}/rentals",
    tag = "rentals",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's rentals", body = Vec<Rental>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_rentals(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Rental>>> {
    let rentals = state.services.rentals.list_user_rentals(user_id).await?;
    Ok(Json(rentals))
}
