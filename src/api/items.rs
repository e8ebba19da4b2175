//! Item endpoints: CRUD, search and comments

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        comment::{CommentDto, CreateComment},
        item::{CreateItem, ItemDetails, ItemDto, ItemSearchQuery, UpdateItem},
    },
    AppState,
};

use super::{ApiJson, SharerId};

/// List the caller's own items
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Owner's items with booking window", body = Vec<ItemDetails>)
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
) -> AppResult<Json<Vec<ItemDetails>>> {
    let items = state.services.items.list_owner_items(user_id).await?;
    Ok(Json(items))
}

/// Get an item with comments
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDetails),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemDetails>> {
    let item = state.services.items.get_item(user_id, id).await?;
    Ok(Json(item))
}

/// Create a new item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Owner ID")
    ),
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = ItemDto),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Owner or request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    ApiJson(item): ApiJson<CreateItem>,
) -> AppResult<(StatusCode, Json<ItemDto>)> {
    let created = state.services.items.create_item(user_id, item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an item (owner only)
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Owner ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = ItemDto),
        (status = 404, description = "Item not found for this owner", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
    ApiJson(item): ApiJson<UpdateItem>,
) -> AppResult<Json<ItemDto>> {
    let updated = state.services.items.update_item(user_id, id, item).await?;
    Ok(Json(updated))
}

/// Search available items by text
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(ItemSearchQuery),
    responses(
        (status = 200, description = "Matching items", body = Vec<ItemDto>)
    )
)]
pub async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<ItemSearchQuery>,
) -> AppResult<Json<Vec<ItemDto>>> {
    let items = state
        .services
        .items
        .search_items(query.text.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(items))
}

/// Comment on an item after a finished booking
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Author ID")
    ),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment added", body = CommentDto),
        (status = 400, description = "No completed booking or blank text", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
    ApiJson(comment): ApiJson<CreateComment>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    let created = state.services.items.add_comment(user_id, id, comment).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
