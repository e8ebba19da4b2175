//! Item request routes

use axum::{
    extract::{Path, Query, State},
    http::Method,
    response::Response,
};
use validator::Validate;

use crate::{
    api::{ApiJson, SharerId},
    error::{AppError, AppResult},
    models::request::{CreateItemRequest, RequestPageQuery},
};

use super::GatewayState;

pub async fn create_request(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    ApiJson(request): ApiJson<CreateItemRequest>,
) -> AppResult<Response> {
    request.validate()?;
    let forwarded = state
        .client
        .request(Method::POST, "/requests", Some(user_id))
        .json(&request);
    state.client.relay(forwarded).await
}

pub async fn list_own_requests(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
) -> AppResult<Response> {
    state.client.get("/requests", Some(user_id)).await
}

pub async fn list_other_requests(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    Query(page): Query<RequestPageQuery>,
) -> AppResult<Response> {
    if page.from < 0 || page.size <= 0 {
        return Err(AppError::InvalidRequest(format!(
            "Invalid paging parameters: from={}, size={}",
            page.from, page.size
        )));
    }
    let request = state
        .client
        .request(Method::GET, "/requests/all", Some(user_id))
        .query(&[("from", page.from), ("size", page.size)]);
    state.client.relay(request).await
}

pub async fn get_request(
    State(state): State<GatewayState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state.client.get(&format!("/requests/{}", id), Some(user_id)).await
}
