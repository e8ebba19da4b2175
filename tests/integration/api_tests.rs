//! Backend API tests over the in-memory store

use axum::http::{Method, StatusCode};
use chrono::Duration;
use rstest::rstest;
use serde_json::json;

use crate::helper::{approve, at, create_booking, create_item, create_user, ids, make_router, send};

#[tokio::test]
async fn test_health_check() -> anyhow::Result<()> {
    let app = make_router();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn test_readiness_names_the_store() -> anyhow::Result<()> {
    let app = make_router();
    let (status, body) = send(&app, Method::GET, "/ready", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "memory");
    Ok(())
}

#[tokio::test]
async fn test_user_lifecycle() -> anyhow::Result<()> {
    let app = make_router();
    let id = create_user(&app, "Anna", "anna@example.com").await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        None,
        Some(json!({ "name": "Other", "email": "anna@example.com" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/{}", id),
        None,
        Some(json!({ "name": "Anne" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Anne");
    assert_eq!(body["email"], "anna@example.com");

    let (status, _) = send(&app, Method::DELETE, &format!("/users/{}", id), None, None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/users/{}", id), None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");
    Ok(())
}

#[rstest]
#[case(json!({ "name": "", "email": "a@example.com" }))]
#[case(json!({ "name": "Anna", "email": "not-an-email" }))]
#[case(json!({ "email": "a@example.com" }))]
#[tokio::test]
async fn test_invalid_user_is_rejected(#[case] body: serde_json::Value) -> anyhow::Result<()> {
    let app = make_router();
    let (status, response) = send(&app, Method::POST, "/users", None, Some(body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "InvalidRequest");
    Ok(())
}

#[rstest]
#[case(None)]
#[case(Some("abc"))]
#[tokio::test]
async fn test_sharer_header_is_required(#[case] header: Option<&str>) -> anyhow::Result<()> {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    let app = make_router();
    let mut request = Request::get("/items");
    if let Some(value) = header {
        request = request.header("X-Sharer-User-Id", value);
    }
    let response = app.oneshot(request.body(Body::empty())?).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_booking_lifecycle() -> anyhow::Result<()> {
    let app = make_router();
    let owner = create_user(&app, "Owner", "owner@example.com").await?;
    let booker = create_user(&app, "Booker", "booker@example.com").await?;
    let stranger = create_user(&app, "Stranger", "stranger@example.com").await?;
    let item = create_item(&app, owner, "Drill", true).await?;

    let start = at(Duration::days(1));
    let end = at(Duration::days(2));

    // Booking one's own item looks like a missing item
    let (status, _) = create_booking(&app, owner, item, start, end).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = create_booking(&app, booker, item, start, end).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "WAITING");
    assert_eq!(body["booker"]["id"], booker);
    assert_eq!(body["item"]["id"], item);
    let booking = body["id"].as_i64().unwrap_or_default();

    // Only the owner decides
    let (status, _) = approve(&app, booker, booking, true).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = approve(&app, owner, booking, true).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "APPROVED");

    // Exactly one transition
    let (status, _) = approve(&app, owner, booking, false).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/bookings/{}", booking);
    for user in [owner, booker] {
        let (status, _) = send(&app, Method::GET, &uri, Some(user), None).await?;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, foreign) = send(&app, Method::GET, &uri, Some(stranger), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, missing) = send(&app, Method::GET, "/bookings/9999", Some(stranger), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(foreign["error"], missing["error"]);

    let (status, _) = approve(&app, owner, 9999, true).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[rstest]
#[case(0)]
#[case(-1)]
#[tokio::test]
async fn test_bad_range_is_rejected(#[case] length_hours: i64) -> anyhow::Result<()> {
    let app = make_router();
    let owner = create_user(&app, "Owner", "owner@example.com").await?;
    let booker = create_user(&app, "Booker", "booker@example.com").await?;
    let item = create_item(&app, owner, "Drill", true).await?;

    let start = at(Duration::days(1));
    let (status, body) = create_booking(&app, booker, item, start, start + Duration::hours(length_hours)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidRequest");
    Ok(())
}

#[tokio::test]
async fn test_unavailable_item_cannot_be_booked() -> anyhow::Result<()> {
    let app = make_router();
    let owner = create_user(&app, "Owner", "owner@example.com").await?;
    let booker = create_user(&app, "Booker", "booker@example.com").await?;
    let item = create_item(&app, owner, "Drill", false).await?;

    let (status, _) = create_booking(&app, booker, item, at(Duration::days(1)), at(Duration::days(2))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = create_booking(&app, booker, 9999, at(Duration::days(1)), at(Duration::days(2))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_booker_state_queries() -> anyhow::Result<()> {
    let app = make_router();
    let owner = create_user(&app, "Owner", "owner@example.com").await?;
    let booker = create_user(&app, "Booker", "booker@example.com").await?;
    let item = create_item(&app, owner, "Tent", true).await?;

    let (_, current) = create_booking(&app, booker, item, at(-Duration::days(1)), at(Duration::days(1))).await?;
    let (_, past) = create_booking(&app, booker, item, at(-Duration::days(8)), at(-Duration::days(7))).await?;
    let current = current["id"].as_i64().unwrap_or_default();
    let past = past["id"].as_i64().unwrap_or_default();
    approve(&app, owner, current, true).await?;
    approve(&app, owner, past, true).await?;

    let (status, body) = send(&app, Method::GET, "/bookings?state=CURRENT", Some(booker), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![current]);

    let (_, body) = send(&app, Method::GET, "/bookings?state=PAST", Some(booker), None).await?;
    assert_eq!(ids(&body), vec![past]);

    let (status, body) = send(&app, Method::GET, "/bookings?state=WAITING", Some(booker), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (_, body) = send(&app, Method::GET, "/bookings?state=ALL", Some(booker), None).await?;
    assert_eq!(ids(&body), vec![current, past]);

    // FUTURE is the same query as ALL
    let (_, body) = send(&app, Method::GET, "/bookings?state=FUTURE", Some(booker), None).await?;
    assert_eq!(ids(&body), vec![current, past]);

    let (_, body) = send(&app, Method::GET, "/bookings/owner?state=PAST", Some(owner), None).await?;
    assert_eq!(ids(&body), vec![past]);
    Ok(())
}

#[rstest]
#[case(true, true)]
#[case(true, false)]
#[case(false, true)]
#[case(false, false)]
#[tokio::test]
async fn test_second_decision_is_refused(#[case] first: bool, #[case] second: bool) -> anyhow::Result<()> {
    let app = make_router();
    let owner = create_user(&app, "Owner", "owner@example.com").await?;
    let booker = create_user(&app, "Booker", "booker@example.com").await?;
    let item = create_item(&app, owner, "Ladder", true).await?;

    let (_, body) = create_booking(&app, booker, item, at(Duration::days(1)), at(Duration::days(2))).await?;
    let booking = body["id"].as_i64().unwrap_or_default();
    let decided = if first { "APPROVED" } else { "REJECTED" };

    let (status, body) = approve(&app, owner, booking, first).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], decided);

    let (status, body) = approve(&app, owner, booking, second).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidRequest");

    let (_, body) = send(&app, Method::GET, &format!("/bookings/{}", booking), Some(owner), None).await?;
    assert_eq!(body["status"], decided);
    Ok(())
}

#[tokio::test]
async fn test_status_filters_return_matches() -> anyhow::Result<()> {
    let app = make_router();
    let owner = create_user(&app, "Owner", "owner@example.com").await?;
    let booker = create_user(&app, "Booker", "booker@example.com").await?;
    let item = create_item(&app, owner, "Trailer", true).await?;

    let (_, rejected) = create_booking(&app, booker, item, at(Duration::days(1)), at(Duration::days(2))).await?;
    let (_, waiting) = create_booking(&app, booker, item, at(Duration::days(3)), at(Duration::days(4))).await?;
    let rejected = rejected["id"].as_i64().unwrap_or_default();
    let waiting = waiting["id"].as_i64().unwrap_or_default();

    let (status, _) = approve(&app, owner, rejected, false).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = approve(&app, owner, rejected, true).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/bookings?state=REJECTED", Some(booker), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![rejected]);
    assert_eq!(body[0]["status"], "REJECTED");

    let (_, body) = send(&app, Method::GET, "/bookings/owner?state=REJECTED", Some(owner), None).await?;
    assert_eq!(ids(&body), vec![rejected]);

    let (status, body) = send(&app, Method::GET, "/bookings/owner?state=WAITING", Some(owner), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![waiting]);
    assert_eq!(body[0]["status"], "WAITING");

    let (_, body) = send(&app, Method::GET, "/bookings?state=WAITING", Some(booker), None).await?;
    assert_eq!(ids(&body), vec![waiting]);

    // No state means ALL, newest start first
    let (_, body) = send(&app, Method::GET, "/bookings/owner", Some(owner), None).await?;
    assert_eq!(ids(&body), vec![waiting, rejected]);
    Ok(())
}

#[tokio::test]
async fn test_unknown_state_names_the_literal() -> anyhow::Result<()> {
    let app = make_router();
    let user = create_user(&app, "Owner", "owner@example.com").await?;

    for uri in ["/bookings?state=SOON", "/bookings/owner?state=SOON", "/bookings?state=all"] {
        let (status, body) = send(&app, Method::GET, uri, Some(user), None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["message"].as_str().unwrap_or_default().starts_with("Unknown state: "));
    }
    Ok(())
}

#[tokio::test]
async fn test_empty_results() -> anyhow::Result<()> {
    let app = make_router();
    let user = create_user(&app, "Owner", "owner@example.com").await?;

    // Owner role with no bookings at all
    for uri in ["/bookings/owner", "/bookings/owner?state=ALL"] {
        let (status, _) = send(&app, Method::GET, uri, Some(user), None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }

    // Booker role: only ALL/FUTURE treat an empty result as missing
    let (status, body) = send(&app, Method::GET, "/bookings", Some(user), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    let (status, _) = send(&app, Method::GET, "/bookings?state=ALL", Some(user), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/bookings?state=REJECTED", Some(user), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_items_search_and_comments() -> anyhow::Result<()> {
    let app = make_router();
    let owner = create_user(&app, "Owner", "owner@example.com").await?;
    let booker = create_user(&app, "Booker", "booker@example.com").await?;
    let item = create_item(&app, owner, "Kayak", true).await?;
    create_item(&app, owner, "Broken kayak", false).await?;

    let (_, body) = send(&app, Method::GET, "/items/search?text=KAYAK", None, None).await?;
    assert_eq!(ids(&body), vec![item]);
    let (_, body) = send(&app, Method::GET, "/items/search?text=", None, None).await?;
    assert_eq!(body, json!([]));

    let comment = json!({ "text": "Stable and dry" });
    let uri = format!("/items/{}/comment", item);
    let (status, _) = send(&app, Method::POST, &uri, Some(booker), Some(comment.clone())).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, booking) = create_booking(&app, booker, item, at(-Duration::days(3)), at(-Duration::days(2))).await?;
    approve(&app, owner, booking["id"].as_i64().unwrap_or_default(), true).await?;

    let (status, body) = send(&app, Method::POST, &uri, Some(booker), Some(comment)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["authorName"], "Booker");

    let (_, body) = send(&app, Method::GET, &format!("/items/{}", item), Some(owner), None).await?;
    assert_eq!(body["comments"][0]["text"], "Stable and dry");
    assert_eq!(body["lastBooking"]["bookerId"], booker);
    assert!(body["nextBooking"].is_null());

    let (_, body) = send(&app, Method::GET, &format!("/items/{}", item), Some(booker), None).await?;
    assert!(body["lastBooking"].is_null());

    // Non-owners cannot edit
    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/items/{}", item),
        Some(booker),
        Some(json!({ "name": "Mine now" })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_item_requests() -> anyhow::Result<()> {
    let app = make_router();
    let asker = create_user(&app, "Asker", "asker@example.com").await?;
    let helper = create_user(&app, "Helper", "helper@example.com").await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/requests",
        Some(asker),
        Some(json!({ "description": "Need a tall ladder" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let request = body["id"].as_i64().unwrap_or_default();

    let (status, _) = send(
        &app,
        Method::POST,
        "/items",
        Some(helper),
        Some(json!({ "name": "Ladder", "description": "Five metres", "available": true, "requestId": request })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, "/requests", Some(asker), None).await?;
    assert_eq!(ids(&body), vec![request]);
    assert_eq!(body[0]["items"][0]["ownerId"], helper);

    let (_, body) = send(&app, Method::GET, "/requests/all?from=0&size=5", Some(helper), None).await?;
    assert_eq!(ids(&body), vec![request]);
    let (_, body) = send(&app, Method::GET, "/requests/all", Some(asker), None).await?;
    assert_eq!(body, json!([]));

    let (status, _) = send(&app, Method::GET, "/requests/all?from=-1&size=5", Some(helper), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, &format!("/requests/{}", request), Some(helper), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Need a tall ladder");
    Ok(())
}
