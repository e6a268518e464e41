mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn root_and_health_respond() -> Result<()> {
    let app = common::test_app();

    let (status, _, body) = common::send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Stashpad API"));

    let (status, _, body) = common::send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("ok"));
    Ok(())
}

#[tokio::test]
async fn stash_crud_round_trip() -> Result<()> {
    let app = common::test_app();

    let (status, _, created) = common::send(
        &app,
        Method::POST,
        "/api/stash/items",
        Some(json!({ "name": "candles", "quantity": 12, "location": "pantry" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _, updated) = common::send(
        &app,
        Method::PUT,
        &format!("/api/stash/items/{}", id),
        Some(json!({ "quantity": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["quantity"], json!(9));
    assert_eq!(updated["data"]["location"], json!("pantry"));

    let (status, _, _) = common::send(
        &app,
        Method::PUT,
        &format!("/api/stash/items/{}", id),
        Some(json!({ "quantity": -3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = common::send(
        &app,
        Method::DELETE,
        &format!("/api/stash/items/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, listed) = common::send(&app, Method::GET, "/api/stash/items", None).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn checklist_done_toggle_sets_and_clears_completion() -> Result<()> {
    let app = common::test_app();

    let (status, _, created) = common::send(
        &app,
        Method::POST,
        "/api/checklist/items",
        Some(json!({ "label": "air out the cellar" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["done"], json!(false));
    assert!(created["data"]["done_at"].is_null());

    let (status, _, done) = common::send(
        &app,
        Method::PATCH,
        &format!("/api/checklist/items/{}", id),
        Some(json!({ "done": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["data"]["done"], json!(true));
    assert!(done["data"]["done_at"].is_string());

    let (status, _, reopened) = common::send(
        &app,
        Method::PATCH,
        &format!("/api/checklist/items/{}", id),
        Some(json!({ "done": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reopened["data"]["done"], json!(false));
    assert!(reopened["data"]["done_at"].is_null());
    Ok(())
}

#[tokio::test]
async fn party_member_add_and_list() -> Result<()> {
    let app = common::test_app();

    let (status, _, created) = common::send(
        &app,
        Method::POST,
        "/api/party/members",
        Some(json!({ "display_name": "Rowan" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // Role defaults when omitted
    assert_eq!(created["data"]["role"], json!("member"));

    let (status, _, _) = common::send(
        &app,
        Method::POST,
        "/api/party/members",
        Some(json!({ "display_name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, listed) = common::send(&app, Method::GET, "/api/party/members", None).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    Ok(())
}
