use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::compat::ResponseMode;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::{Build, BuildChanges, BuildComponent, NewBuild};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BuildPayload {
    pub name: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ComponentPayload {
    pub item_name: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct BuildUpdatePayload {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub components: Option<Vec<ComponentPayload>>,
}

fn components_from_payload(components: Vec<ComponentPayload>) -> Result<Vec<BuildComponent>, ApiError> {
    components
        .into_iter()
        .map(|c| {
            if c.item_name.trim().is_empty() {
                return Err(ApiError::bad_request("component item_name must not be empty"));
            }
            if c.quantity < 0 {
                return Err(ApiError::bad_request("component quantity must not be negative"));
            }
            Ok(BuildComponent { item_name: c.item_name, quantity: c.quantity })
        })
        .collect()
}

/// GET /api/builds - list all builds
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    list_with_mode(state, ResponseMode::Canonical).await
}

pub(crate) async fn list_with_mode(state: AppState, mode: ResponseMode) -> ApiResult<Value> {
    let builds = state.store.list_builds().await?;
    let shaped: Vec<Value> = builds.iter().map(|b| build_to_value(b, mode)).collect();

    let data = match mode {
        ResponseMode::Canonical => Value::Array(shaped),
        // Pre-rename dialect wrapped the collection under the old noun
        ResponseMode::Legacy => json!({ "recipes": shaped }),
    };
    Ok(ApiResponse::success(data))
}

/// GET /api/builds/:id - show a single build
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Value> {
    get_with_mode(state, id, ResponseMode::Canonical).await
}

pub(crate) async fn get_with_mode(state: AppState, id: Uuid, mode: ResponseMode) -> ApiResult<Value> {
    let build = state
        .store
        .get_build(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("build {} not found", id)))?;

    let data = match mode {
        ResponseMode::Canonical => build_to_value(&build, mode),
        ResponseMode::Legacy => json!({ "recipe": build_to_value(&build, mode) }),
    };
    Ok(ApiResponse::success(data))
}

/// POST /api/builds - create a build
pub async fn create(State(state): State<AppState>, Json(payload): Json<BuildPayload>) -> ApiResult<Build> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("build name must not be empty"));
    }
    let components = components_from_payload(payload.components)?;

    let build = state
        .store
        .insert_build(NewBuild { name: payload.name, notes: payload.notes, components })
        .await?;
    Ok(ApiResponse::created(build))
}

/// PUT /api/builds/:id - update a build
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BuildUpdatePayload>,
) -> ApiResult<Build> {
    if matches!(&payload.name, Some(name) if name.trim().is_empty()) {
        return Err(ApiError::bad_request("build name must not be empty"));
    }
    let components = payload.components.map(components_from_payload).transpose()?;

    let changes = BuildChanges { name: payload.name, notes: payload.notes, components };
    let build = state
        .store
        .update_build(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("build {} not found", id)))?;
    Ok(ApiResponse::success(build))
}

/// DELETE /api/builds/:id - delete a build
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Value> {
    if !state.store.delete_build(id).await? {
        return Err(ApiError::not_found(format!("build {} not found", id)));
    }
    Ok(ApiResponse::success(json!({ "deleted": true })))
}

/// POST /api/builds/:id/translate - expand a build's components against the
/// current stash contents
pub async fn translate(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Value> {
    translate_with_mode(state, id, ResponseMode::Canonical).await
}

pub(crate) async fn translate_with_mode(state: AppState, id: Uuid, mode: ResponseMode) -> ApiResult<Value> {
    let build = state
        .store
        .get_build(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("build {} not found", id)))?;
    let stash = state.store.list_stash_items().await?;

    // Stash quantities are summed per component name, case-insensitively;
    // the same pantry item may be stored in several locations.
    let requirements: Vec<(BuildComponent, i64)> = build
        .components
        .iter()
        .map(|component| {
            let on_hand: i64 = stash
                .iter()
                .filter(|item| item.name.eq_ignore_ascii_case(&component.item_name))
                .map(|item| item.quantity)
                .sum();
            (component.clone(), on_hand)
        })
        .collect();
    let satisfied = requirements.iter().all(|(c, on_hand)| *on_hand >= c.quantity);

    let data = match mode {
        ResponseMode::Canonical => json!({
            "build_id": build.id,
            "name": build.name,
            "requirements": requirements
                .iter()
                .map(|(c, on_hand)| json!({
                    "item": c.item_name,
                    "required": c.quantity,
                    "on_hand": on_hand,
                    "missing": (c.quantity - on_hand).max(0),
                }))
                .collect::<Vec<_>>(),
            "satisfied": satisfied,
        }),
        ResponseMode::Legacy => json!({
            "recipeId": build.id,
            "recipeName": build.name,
            "ingredients": requirements
                .iter()
                .map(|(c, on_hand)| json!({
                    "name": c.item_name,
                    "qty": c.quantity,
                    "inStash": on_hand,
                }))
                .collect::<Vec<_>>(),
            "craftable": satisfied,
        }),
    };
    Ok(ApiResponse::success(data))
}

fn build_to_value(build: &Build, mode: ResponseMode) -> Value {
    match mode {
        ResponseMode::Canonical => json!(build),
        ResponseMode::Legacy => json!({
            "id": build.id,
            "name": build.name,
            "notes": build.notes,
            "ingredients": build
                .components
                .iter()
                .map(|c| json!({ "name": c.item_name, "qty": c.quantity }))
                .collect::<Vec<_>>(),
        }),
    }
}
