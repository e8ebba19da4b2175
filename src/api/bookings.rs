//! Booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        booking::{ApprovalQuery, BookingDto, BookingListQuery, BookingRole, CreateBooking},
        required,
    },
    AppState,
};

use super::{ApiJson, SharerId};

/// Request a booking
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Booker ID")
    ),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created in WAITING status", body = BookingDto),
        (status = 400, description = "Invalid time range or unavailable item", body = crate::error::ErrorResponse),
        (status = 404, description = "User or item not found, or own item", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    ApiJson(booking): ApiJson<CreateBooking>,
) -> AppResult<(StatusCode, Json<BookingDto>)> {
    let created = state
        .services
        .bookings
        .create_booking(
            user_id,
            required(booking.item_id, "Item ID")?,
            required(booking.start, "Start time")?,
            required(booking.end, "End time")?,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Approve or reject a booking (item owner only)
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Item owner ID"),
        ApprovalQuery
    ),
    responses(
        (status = 200, description = "Booking approved or rejected", body = BookingDto),
        (status = 400, description = "Not the owner, or already decided", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_approval(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
    Query(query): Query<ApprovalQuery>,
) -> AppResult<Json<BookingDto>> {
    let booking = state
        .services
        .bookings
        .set_approval(user_id, id, query.approved)
        .await?;
    Ok(Json(booking))
}

/// Get a booking as its booker or the item's owner
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Booking", body = BookingDto),
        (status = 404, description = "Booking not found for this user", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingDto>> {
    let booking = state.services.bookings.get_booking(id, user_id).await?;
    Ok(Json(booking))
}

/// List the caller's bookings as booker
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Booker ID"),
        BookingListQuery
    ),
    responses(
        (status = 200, description = "Bookings", body = Vec<BookingDto>),
        (status = 400, description = "Unknown state", body = crate::error::ErrorResponse),
        (status = 404, description = "No bookings for ALL/FUTURE", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<Vec<BookingDto>>> {
    let bookings = state
        .services
        .bookings
        .list_bookings(BookingRole::Booker, user_id, query.state.as_deref())
        .await?;
    Ok(Json(bookings))
}

/// List bookings of the caller's items
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Item owner ID"),
        BookingListQuery
    ),
    responses(
        (status = 200, description = "Bookings", body = Vec<BookingDto>),
        (status = 400, description = "Unknown state", body = crate::error::ErrorResponse),
        (status = 404, description = "Owner has no bookings", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<Vec<BookingDto>>> {
    let bookings = state
        .services
        .bookings
        .list_bookings(BookingRole::Owner, user_id, query.state.as_deref())
        .await?;
    Ok(Json(bookings))
}
