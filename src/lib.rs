use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod compat;
pub mod config;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod store;

use store::Store;

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

pub fn app(state: AppState) -> Router {
    // Canonical API plus the legacy alias surface; both sit behind the same
    // auth boundary when it is enabled.
    let mut api = api_routes().merge(compat::legacy_router());
    if config::config().security.require_auth {
        api = api.route_layer(axum::middleware::from_fn(middleware::auth::require_auth));
    }

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(api)
        .layer(TraceLayer::new_for_http());

    let router = if config::config().security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

fn api_routes() -> Router<AppState> {
    use axum::routing::{delete, patch, post, put};
    use handlers::{builds, checklist, members, stash};

    Router::new()
        // Crafting builds
        .route("/api/builds", get(builds::list).post(builds::create))
        .route(
            "/api/builds/:id",
            get(builds::get).put(builds::update).delete(builds::remove),
        )
        .route("/api/builds/:id/translate", post(builds::translate))
        // Stash contents
        .route("/api/stash/items", get(stash::list).post(stash::create))
        .route(
            "/api/stash/items/:id",
            put(stash::update).delete(stash::remove),
        )
        // Shared checklist
        .route(
            "/api/checklist/items",
            get(checklist::list).post(checklist::create),
        )
        .route(
            "/api/checklist/items/:id",
            patch(checklist::toggle).delete(checklist::remove),
        )
        // Party membership
        .route("/api/party/members", get(members::list).post(members::add))
        .route("/api/party/members/:id", delete(members::remove))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Stashpad API",
            "version": version,
            "description": "Household stash, checklist and build tracking backend",
            "endpoints": {
                "home": "/ (public)",
                "builds": "/api/builds[/:id][/translate]",
                "stash": "/api/stash/items[/:id]",
                "checklist": "/api/checklist/items[/:id]",
                "party": "/api/party/members[/:id]",
                "legacy": "/legacy/* (deprecated aliases, see x-sunset-route headers)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}
