//! User routes

use axum::{
    extract::{Path, State},
    http::Method,
    response::Response,
};
use validator::Validate;

use crate::{
    api::ApiJson,
    error::AppResult,
    models::user::{CreateUser, UpdateUser},
};

use super::GatewayState;

pub async fn list_users(State(state): State<GatewayState>) -> AppResult<Response> {
    state.client.get("/users", None).await
}

pub async fn get_user(State(state): State<GatewayState>, Path(id): Path<i64>) -> AppResult<Response> {
    state.client.get(&format!("/users/{}", id), None).await
}

pub async fn create_user(
    State(state): State<GatewayState>,
    ApiJson(user): ApiJson<CreateUser>,
) -> AppResult<Response> {
    user.validate()?;
    let request = state.client.request(Method::POST, "/users", None).json(&user);
    state.client.relay(request).await
}

pub async fn update_user(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    ApiJson(user): ApiJson<UpdateUser>,
) -> AppResult<Response> {
    user.validate()?;
    let request = state
        .client
        .request(Method::PATCH, &format!("/users/{}", id), None)
        .json(&user);
    state.client.relay(request).await
}

pub async fn delete_user(State(state): State<GatewayState>, Path(id): Path<i64>) -> AppResult<Response> {
    state.client.delete(&format!("/users/{}", id), None).await
}
