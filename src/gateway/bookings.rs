//! Booking routes: time-range and paging checks, then forwarding

use axum::{
    extract::{Path, Query, State},
    http::Method,
    response::Response,
};
use chrono::{NaiveDateTime, Utc};

use crate::{
    api::{ApiJson, SharerId},
    error::{AppError, AppResult},
    models::{
        booking::{ApprovalQuery, BookingListQuery, BookingState, CreateBooking},
        required,
    },
};

use super::GatewayState;

const DEFAULT_PAGE_SIZE: i64 = 10;

/// Checks a requested booking window against `now`
pub(crate) fn check_booking_window(start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> AppResult<()> {
    if start < now {
        return Err(AppError::InvalidRequest("start must not be in the past".to_string()));
    }
    if end <= now {
        return Err(AppError::InvalidRequest("end must be in the future".to_string()));
    }
    if start > end {
        return Err(AppError::InvalidRequest("start cannot be after end".to_string()));
    }
    if start == end {
        return Err(AppError::InvalidRequest("start cannot equal end".to_string()));
    }
    Ok(())
}

/// Validates list parameters and returns them as a forwarded query string
fn list_query(query: &BookingListQuery) -> AppResult<Vec<(&'static str, String)>> {
    let from = query.from.unwrap_or(0);
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
    if from < 0 || size <= 0 {
        return Err(AppError::InvalidRequest(format!(
            "Invalid paging parameters: from={}, size={}",
            from, size
        )));
    }

    let mut params = vec![("from", from.to_string()), ("size", size.to_string())];
    if let Some(state) = &query.state {
        let state: BookingState = state.parse()?;
        params.push(("state", state.as_str().to_string()));
    }
    Ok(params)
}

pub async fn create_booking(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    ApiJson(booking): ApiJson<CreateBooking>,
) -> AppResult<Response> {
    required(booking.item_id, "Item ID")?;
    let start = required(booking.start, "Start time")?;
    let end = required(booking.end, "End time")?;
    check_booking_window(start, end, Utc::now().naive_utc())?;

    tracing::info!(user_id, item_id = ?booking.item_id, "Forwarding booking creation");
    let request = state
        .client
        .request(Method::POST, "/bookings", Some(user_id))
        .json(&booking);
    state.client.relay(request).await
}

pub async fn set_approval(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
    Query(query): Query<ApprovalQuery>,
) -> AppResult<Response> {
    let request = state
        .client
        .request(Method::PATCH, &format!("/bookings/{}", id), Some(user_id))
        .query(&[("approved", query.approved)]);
    state.client.relay(request).await
}

pub async fn get_booking(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state.client.get(&format!("/bookings/{}", id), Some(user_id)).await
}

pub async fn list_bookings(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Response> {
    let params = list_query(&query)?;
    let request = state
        .client
        .request(Method::GET, "/bookings", Some(user_id))
        .query(&params);
    state.client.relay(request).await
}

pub async fn list_owner_bookings(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Response> {
    let params = list_query(&query)?;
    let request = state
        .client
        .request(Method::GET, "/bookings/owner", Some(user_id))
        .query(&params);
    state.client.relay(request).await
}
