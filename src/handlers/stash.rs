use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::{NewStashItem, StashItem, StashItemChanges};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StashItemPayload {
    pub name: String,
    pub quantity: i64,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StashItemUpdatePayload {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub location: Option<String>,
}

/// GET /api/stash/items - list stash contents
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<StashItem>> {
    let items = state.store.list_stash_items().await?;
    Ok(ApiResponse::success(items))
}

/// POST /api/stash/items - add a stash item
pub async fn create(State(state): State<AppState>, Json(payload): Json<StashItemPayload>) -> ApiResult<StashItem> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("item name must not be empty"));
    }
    if payload.quantity < 0 {
        return Err(ApiError::bad_request("quantity must not be negative"));
    }

    let item = state
        .store
        .insert_stash_item(NewStashItem {
            name: payload.name,
            quantity: payload.quantity,
            location: payload.location,
        })
        .await?;
    Ok(ApiResponse::created(item))
}

/// PUT /api/stash/items/:id - update a stash item
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StashItemUpdatePayload>,
) -> ApiResult<StashItem> {
    if matches!(&payload.name, Some(name) if name.trim().is_empty()) {
        return Err(ApiError::bad_request("item name must not be empty"));
    }
    if matches!(payload.quantity, Some(q) if q < 0) {
        return Err(ApiError::bad_request("quantity must not be negative"));
    }

    let changes = StashItemChanges {
        name: payload.name,
        quantity: payload.quantity,
        location: payload.location,
    };
    let item = state
        .store
        .update_stash_item(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("stash item {} not found", id)))?;
    Ok(ApiResponse::success(item))
}

/// DELETE /api/stash/items/:id - remove a stash item
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Value> {
    if !state.store.delete_stash_item(id).await? {
        return Err(ApiError::not_found(format!("stash item {} not found", id)));
    }
    Ok(ApiResponse::success(json!({ "deleted": true })))
}
