//! Item routes

use axum::{
    extract::{Path, Query, State},
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::{
    api::{ApiJson, SharerId},
    error::AppResult,
    models::{
        comment::CreateComment,
        item::{CreateItem, ItemDto, ItemSearchQuery, UpdateItem},
    },
};

use super::GatewayState;

pub async fn list_items(State(state): State<GatewayState>, SharerId(user_id): SharerId) -> AppResult<Response> {
    state.client.get("/items", Some(user_id)).await
}

pub async fn get_item(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state.client.get(&format!("/items/{}", id), Some(user_id)).await
}

pub async fn create_item(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    ApiJson(item): ApiJson<CreateItem>,
) -> AppResult<Response> {
    item.validate()?;
    let request = state
        .client
        .request(Method::POST, "/items", Some(user_id))
        .json(&item);
    state.client.relay(request).await
}

pub async fn update_item(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
    ApiJson(item): ApiJson<UpdateItem>,
) -> AppResult<Response> {
    let request = state
        .client
        .request(Method::PATCH, &format!("/items/{}", id), Some(user_id))
        .json(&item);
    state.client.relay(request).await
}

/// Blank text answers `[]` without asking the server
pub async fn search_items(
    State(state): State<GatewayState>,
    Query(query): Query<ItemSearchQuery>,
) -> AppResult<Response> {
    let text = query.text.unwrap_or_default();
    if text.trim().is_empty() {
        return Ok(Json(Vec::<ItemDto>::new()).into_response());
    }
    let request = state
        .client
        .request(Method::GET, "/items/search", None)
        .query(&[("text", text)]);
    state.client.relay(request).await
}

pub async fn add_comment(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
    ApiJson(comment): ApiJson<CreateComment>,
) -> AppResult<Response> {
    comment.validate()?;
    let request = state
        .client
        .request(Method::POST, &format!("/items/{}/comment", id), Some(user_id))
        .json(&comment);
    state.client.relay(request).await
}
