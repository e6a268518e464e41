use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::{ChecklistItem, NewChecklistItem};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChecklistItemPayload {
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct ChecklistTogglePayload {
    pub done: bool,
}

/// GET /api/checklist/items - list checklist items
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ChecklistItem>> {
    let items = state.store.list_checklist_items().await?;
    Ok(ApiResponse::success(items))
}

/// POST /api/checklist/items - add a checklist item
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ChecklistItemPayload>,
) -> ApiResult<ChecklistItem> {
    if payload.label.trim().is_empty() {
        return Err(ApiError::bad_request("label must not be empty"));
    }

    let item = state
        .store
        .insert_checklist_item(NewChecklistItem { label: payload.label })
        .await?;
    Ok(ApiResponse::created(item))
}

/// PATCH /api/checklist/items/:id - mark a checklist item done or not done
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChecklistTogglePayload>,
) -> ApiResult<ChecklistItem> {
    let item = state
        .store
        .set_checklist_done(id, payload.done)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("checklist item {} not found", id)))?;
    Ok(ApiResponse::success(item))
}

/// DELETE /api/checklist/items/:id - remove a checklist item
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Value> {
    if !state.store.delete_checklist_item(id).await? {
        return Err(ApiError::not_found(format!("checklist item {} not found", id)));
    }
    Ok(ApiResponse::success(json!({ "deleted": true })))
}
