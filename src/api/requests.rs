//! Item request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::request::{CreateItemRequest, ItemRequestDto, RequestPageQuery},
    AppState,
};

use super::{ApiJson, SharerId};

/// Ask the community for an item
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Requestor ID")
    ),
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Request created", body = ItemRequestDto),
        (status = 400, description = "Blank description", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    ApiJson(request): ApiJson<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ItemRequestDto>)> {
    let created = state.services.requests.create_request(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// The caller's own requests, newest first
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Requestor ID")
    ),
    responses(
        (status = 200, description = "Own requests with answers", body = Vec<ItemRequestDto>)
    )
)]
pub async fn list_own_requests(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
) -> AppResult<Json<Vec<ItemRequestDto>>> {
    let requests = state.services.requests.list_own(user_id).await?;
    Ok(Json(requests))
}

/// Other users' requests, one page at a time
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user ID"),
        RequestPageQuery
    ),
    responses(
        (status = 200, description = "Requests of other users", body = Vec<ItemRequestDto>),
        (status = 400, description = "Invalid paging", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_other_requests(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Query(page): Query<RequestPageQuery>,
) -> AppResult<Json<Vec<ItemRequestDto>>> {
    let requests = state
        .services
        .requests
        .list_others(user_id, page.from, page.size)
        .await?;
    Ok(Json(requests))
}

/// Get a request with its answers
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i64, Path, description = "Request ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Request", body = ItemRequestDto),
        (status = 404, description = "User or request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemRequestDto>> {
    let request = state.services.requests.get_request(user_id, id).await?;
    Ok(Json(request))
}
