use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::compat::ResponseMode;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::{NewMember, PartyMember};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MemberPayload {
    pub display_name: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "member".to_string()
}

/// GET /api/party/members - list party members
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    list_with_mode(state, ResponseMode::Canonical).await
}

pub(crate) async fn list_with_mode(state: AppState, mode: ResponseMode) -> ApiResult<Value> {
    let members = state.store.list_members().await?;

    let data = match mode {
        ResponseMode::Canonical => json!(members),
        // The hideout-era dialect: wrapper object, camelCase, no join date
        ResponseMode::Legacy => json!({
            "members": members
                .iter()
                .map(|m| json!({
                    "id": m.id,
                    "displayName": m.display_name,
                    "role": m.role,
                }))
                .collect::<Vec<_>>(),
        }),
    };
    Ok(ApiResponse::success(data))
}

/// POST /api/party/members - add a party member
pub async fn add(State(state): State<AppState>, Json(payload): Json<MemberPayload>) -> ApiResult<PartyMember> {
    if payload.display_name.trim().is_empty() {
        return Err(ApiError::bad_request("display_name must not be empty"));
    }

    let member = state
        .store
        .insert_member(NewMember { display_name: payload.display_name, role: payload.role })
        .await?;
    Ok(ApiResponse::created(member))
}

/// DELETE /api/party/members/:id - remove a party member
///
/// Deletion has no dialect distinction, so the legacy aliases route here
/// directly with no mode argument.
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Value> {
    if !state.store.delete_member(id).await? {
        return Err(ApiError::not_found(format!("member {} not found", id)));
    }
    Ok(ApiResponse::success(json!({ "deleted": true })))
}
