//! Gateway tests: validation without a server, then forwarding to a live one

use axum::{
    http::{Method, StatusCode},
    Router,
};
use chrono::Duration;
use rstest::rstest;
use serde_json::{json, Value};

use shareit::{
    config::GatewayConfig,
    gateway::{self, GatewayState},
};

use crate::helper::{at, make_router, send};

/// Gateway pointed at a port nothing listens on: anything forwarded turns into 502
fn detached_gateway() -> anyhow::Result<Router> {
    let config = GatewayConfig {
        server_url: "http://127.0.0.1:1".into(),
        timeout_secs: 2,
        ..Default::default()
    };
    Ok(gateway::router(GatewayState::new(&config)?))
}

/// Gateway in front of a backend served on an ephemeral port
async fn connected_gateway() -> anyhow::Result<Router> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let backend = make_router();
    tokio::spawn(async move {
        axum::serve(listener, backend).await.ok();
    });

    let config = GatewayConfig {
        server_url: format!("http://{}", addr),
        timeout_secs: 5,
        ..Default::default()
    };
    Ok(gateway::router(GatewayState::new(&config)?))
}

fn booking(start_days: i64, end_days: i64) -> Value {
    json!({
        "itemId": 1,
        "start": at(Duration::days(start_days)),
        "end": at(Duration::days(end_days)),
    })
}

#[rstest]
#[case(Method::POST, "/bookings", Some(booking(-1, 2)))]
#[case(Method::POST, "/bookings", Some(booking(1, -1)))]
#[case(Method::POST, "/bookings", Some(booking(3, 2)))]
#[case(Method::POST, "/bookings", Some(json!({ "start": at(Duration::days(1)), "end": at(Duration::days(2)) })))]
#[case(Method::GET, "/bookings?state=SOMEDAY", None)]
#[case(Method::GET, "/bookings/owner?from=-1", None)]
#[case(Method::GET, "/bookings?size=0", None)]
#[case(Method::POST, "/items", Some(json!({ "name": " ", "description": "x", "available": true })))]
#[case(Method::POST, "/items", Some(json!({ "name": "Drill", "description": "x" })))]
#[case(Method::POST, "/items/1/comment", Some(json!({ "text": "" })))]
#[case(Method::POST, "/requests", Some(json!({ "description": "   " })))]
#[case(Method::GET, "/requests/all?from=0&size=0", None)]
#[tokio::test]
async fn test_invalid_calls_are_not_forwarded(
    #[case] method: Method,
    #[case] uri: &str,
    #[case] body: Option<Value>,
) -> anyhow::Result<()> {
    let app = detached_gateway()?;
    let (status, response) = send(&app, method, uri, Some(1), body).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", response);
    assert_eq!(response["error"], "InvalidRequest");
    Ok(())
}

#[rstest]
#[case(json!({ "name": "Anna", "email": "nope" }))]
#[case(json!({ "name": "", "email": "anna@example.com" }))]
#[tokio::test]
async fn test_invalid_user_is_not_forwarded(#[case] body: Value) -> anyhow::Result<()> {
    let app = detached_gateway()?;
    let (status, _) = send(&app, Method::POST, "/users", None, Some(body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_blank_search_answers_locally() -> anyhow::Result<()> {
    let app = detached_gateway()?;
    let (status, body) = send(&app, Method::GET, "/items/search?text=%20", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_is_bad_gateway() -> anyhow::Result<()> {
    let app = detached_gateway()?;
    let (status, body) = send(&app, Method::GET, "/users", None, None).await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "UpstreamFailure");
    Ok(())
}

#[tokio::test]
async fn test_forwarding_relays_server_answers() -> anyhow::Result<()> {
    let app = connected_gateway().await?;

    let (status, owner) = send(
        &app,
        Method::POST,
        "/users",
        None,
        Some(json!({ "name": "Owner", "email": "owner@example.com" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let owner = owner["id"].as_i64().unwrap_or_default();

    let (_, booker) = send(
        &app,
        Method::POST,
        "/users",
        None,
        Some(json!({ "name": "Booker", "email": "booker@example.com" })),
    )
    .await?;
    let booker = booker["id"].as_i64().unwrap_or_default();

    let (status, item) = send(
        &app,
        Method::POST,
        "/items",
        Some(owner),
        Some(json!({ "name": "Canoe", "description": "Two seats", "available": true })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let item = item["id"].as_i64().unwrap_or_default();

    let (status, booking) = send(
        &app,
        Method::POST,
        "/bookings",
        Some(booker),
        Some(json!({ "itemId": item, "start": at(Duration::days(1)), "end": at(Duration::days(2)) })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["status"], "WAITING");
    let booking = booking["id"].as_i64().unwrap_or_default();

    let (status, approved) = send(
        &app,
        Method::PATCH,
        &format!("/bookings/{}?approved=true", booking),
        Some(owner),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "APPROVED");

    // Server-side errors come back unchanged
    let (status, body) = send(&app, Method::GET, &format!("/bookings/{}", booking), Some(999), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");

    let (status, body) = send(&app, Method::GET, "/bookings/owner?state=WAITING", Some(owner), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(&app, Method::DELETE, &format!("/users/{}", booker), None, None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    Ok(())
}
