mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

async fn create_build(app: &axum::Router, payload: Value) -> (StatusCode, Value) {
    let (status, _, body) = common::send(app, Method::POST, "/api/builds", Some(payload)).await;
    (status, body)
}

#[tokio::test]
async fn build_crud_round_trip() -> Result<()> {
    let app = common::test_app();

    let (status, created) = create_build(
        &app,
        json!({
            "name": "root cellar shelf",
            "notes": "north wall",
            "components": [{ "item_name": "plank", "quantity": 6 }]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _, fetched) =
        common::send(&app, Method::GET, &format!("/api/builds/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["name"], json!("root cellar shelf"));
    assert_eq!(fetched["data"]["components"][0]["item_name"], json!("plank"));

    let (status, _, updated) = common::send(
        &app,
        Method::PUT,
        &format!("/api/builds/{}", id),
        Some(json!({ "name": "cellar shelf" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], json!("cellar shelf"));
    // Untouched fields survive a partial update
    assert_eq!(updated["data"]["notes"], json!("north wall"));

    let (status, _, deleted) =
        common::send(&app, Method::DELETE, &format!("/api/builds/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["data"]["deleted"], json!(true));

    let (status, _, _) =
        common::send(&app, Method::GET, &format!("/api/builds/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn build_validation_rejects_bad_payloads() -> Result<()> {
    let app = common::test_app();

    let (status, body) = create_build(&app, json!({ "name": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("BAD_REQUEST"));

    let (status, _) = create_build(
        &app,
        json!({
            "name": "broken",
            "components": [{ "item_name": "nail", "quantity": -1 }]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn translate_computes_missing_quantities_from_stash() -> Result<()> {
    let app = common::test_app();

    let (_, created) = create_build(
        &app,
        json!({
            "name": "rain barrel",
            "components": [
                { "item_name": "barrel", "quantity": 1 },
                { "item_name": "spigot", "quantity": 2 }
            ]
        }),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Spigots live in two stash locations; quantities are summed
    for payload in [
        json!({ "name": "barrel", "quantity": 1, "location": "shed" }),
        json!({ "name": "Spigot", "quantity": 1, "location": "shed" }),
        json!({ "name": "spigot", "quantity": 1, "location": "garage" }),
    ] {
        let (status, _, _) =
            common::send(&app, Method::POST, "/api/stash/items", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _, body) = common::send(
        &app,
        Method::POST,
        &format!("/api/builds/{}/translate", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["satisfied"], json!(true));

    let requirements = body["data"]["requirements"].as_array().unwrap();
    assert_eq!(requirements.len(), 2);
    assert_eq!(requirements[1]["item"], json!("spigot"));
    assert_eq!(requirements[1]["required"], json!(2));
    assert_eq!(requirements[1]["on_hand"], json!(2));
    assert_eq!(requirements[1]["missing"], json!(0));
    Ok(())
}

#[tokio::test]
async fn translate_unknown_build_is_404() -> Result<()> {
    let app = common::test_app();
    let (status, _, body) = common::send(
        &app,
        Method::POST,
        "/api/builds/00000000-0000-0000-0000-000000000000/translate",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("NOT_FOUND"));
    Ok(())
}
