use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDateTime, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use shareit::{api, config::AppConfig, repository::Repository, AppState};

/// Backend router over a fresh in-memory store
pub fn make_router() -> Router {
    let mut config = AppConfig::default();
    config.database.in_memory = true;
    api::router(AppState::new(config, Repository::in_memory()))
}

/// Send one request through `app` and decode the JSON answer (`Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user_id: Option<i64>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header(api::SHARER_HEADER, id.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    Ok((status, value))
}

pub fn at(offset: Duration) -> NaiveDateTime {
    Utc::now().naive_utc() + offset
}

pub async fn create_user(app: &Router, name: &str, email: &str) -> anyhow::Result<i64> {
    let (status, body) = send(
        app,
        Method::POST,
        "/users",
        None,
        Some(json!({ "name": name, "email": email })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().ok_or_else(|| anyhow::anyhow!("no id in {}", body))
}

pub async fn create_item(app: &Router, owner: i64, name: &str, available: bool) -> anyhow::Result<i64> {
    let (status, body) = send(
        app,
        Method::POST,
        "/items",
        Some(owner),
        Some(json!({ "name": name, "description": format!("{} for rent", name), "available": available })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().ok_or_else(|| anyhow::anyhow!("no id in {}", body))
}

pub async fn create_booking(
    app: &Router,
    booker: i64,
    item: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> anyhow::Result<(StatusCode, Value)> {
    send(
        app,
        Method::POST,
        "/bookings",
        Some(booker),
        Some(json!({ "itemId": item, "start": start, "end": end })),
    )
    .await
}

pub async fn approve(app: &Router, owner: i64, booking: i64, approved: bool) -> anyhow::Result<(StatusCode, Value)> {
    send(
        app,
        Method::PATCH,
        &format!("/bookings/{}?approved={}", booking, approved),
        Some(owner),
        None,
    )
    .await
}

pub fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .map(|list| list.iter().filter_map(|v| v["id"].as_i64()).collect())
        .unwrap_or_default()
}
