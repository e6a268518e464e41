use axum::extract::{Path, State};
use axum::middleware::map_response;
use axum::response::Response;
use axum::routing::{delete, get, post, MethodRouter};
use axum::Router;
use uuid::Uuid;

use super::annotate::annotate;
use super::ResponseMode;
use crate::handlers::{builds, members};
use crate::AppState;

/// One retired route kept alive for old clients. `target` is the canonical
/// handler, bound to the legacy response dialect where the handler is
/// dual-mode. Aliases are wired at build time only; there is no runtime
/// registry.
pub struct RouteAlias {
    pub legacy_path: &'static str,
    pub method: &'static str,
    pub sunset_route: &'static str,
    pub target: MethodRouter<AppState>,
}

/// The full alias table. Party members were renamed from hideout members, and
/// builds from recipes; every older spelling stays routable, so two aliases
/// for the same canonical resource coexist here.
fn aliases() -> Vec<RouteAlias> {
    vec![
        RouteAlias {
            legacy_path: "/legacy/party-members",
            method: "GET",
            sunset_route: "/api/party/members",
            target: get(|State(state): State<AppState>| async move {
                members::list_with_mode(state, ResponseMode::Legacy).await
            }),
        },
        RouteAlias {
            legacy_path: "/legacy/hideout-members",
            method: "GET",
            sunset_route: "/api/party/members",
            target: get(|State(state): State<AppState>| async move {
                members::list_with_mode(state, ResponseMode::Legacy).await
            }),
        },
        // Deletes are structurally identical in both dialects, so the
        // canonical handler is routed as-is, with no mode argument.
        RouteAlias {
            legacy_path: "/legacy/party-members/:id",
            method: "DELETE",
            sunset_route: "/api/party/members/:id",
            target: delete(members::remove),
        },
        RouteAlias {
            legacy_path: "/legacy/hideout-members/:id",
            method: "DELETE",
            sunset_route: "/api/party/members/:id",
            target: delete(members::remove),
        },
        RouteAlias {
            legacy_path: "/legacy/recipes",
            method: "GET",
            sunset_route: "/api/builds",
            target: get(|State(state): State<AppState>| async move {
                builds::list_with_mode(state, ResponseMode::Legacy).await
            }),
        },
        RouteAlias {
            legacy_path: "/legacy/recipes/:id",
            method: "GET",
            sunset_route: "/api/builds/:id",
            target: get(|State(state): State<AppState>, Path(id): Path<Uuid>| async move {
                builds::get_with_mode(state, id, ResponseMode::Legacy).await
            }),
        },
        RouteAlias {
            legacy_path: "/legacy/recipes/:id/translate",
            method: "POST",
            sunset_route: "/api/builds/:id/translate",
            target: post(|State(state): State<AppState>, Path(id): Path<Uuid>| async move {
                builds::translate_with_mode(state, id, ResponseMode::Legacy).await
            }),
        },
    ]
}

/// Register every alias and wrap it in a response layer applying the
/// deprecation annotation for that route. Because the layer sits outside the
/// handler, every response that leaves a legacy route is annotated: success,
/// handler errors, and extractor rejections alike.
pub fn legacy_router() -> Router<AppState> {
    let mut router = Router::new();
    for alias in aliases() {
        let RouteAlias { legacy_path, method, sunset_route, target } = alias;
        router = router.route(
            legacy_path,
            target.layer(map_response(move |response: Response| async move {
                annotate(response, sunset_route, method)
            })),
        );
    }
    router
}
