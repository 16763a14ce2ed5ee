use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use lootledger_core::MemberId;
use lootledger_roster::MemberDraft;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route("/:id", put(update_member).delete(delete_member))
        .route("/:id/rank", post(assign_rank))
        .route("/:id/inventory", get(member_inventory))
        .route("/:id/registries", get(member_registries))
}

fn parse_member_id(raw: &str) -> Result<MemberId, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid member id")
    })
}

/// List the roster; `?q=` switches to the capped autocomplete search.
pub async fn list_members(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let members: Vec<_> = match params.get("q") {
        Some(q) => services
            .admin
            .search_roster(q)
            .await
            .iter()
            .map(dto::member_to_json)
            .collect(),
        None => services
            .cache
            .snapshot()
            .members_sorted()
            .into_iter()
            .map(dto::member_to_json)
            .collect(),
    };
    (StatusCode::OK, Json(serde_json::json!({ "members": members }))).into_response()
}

pub async fn create_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(draft): Json<MemberDraft>,
) -> axum::response::Response {
    match services.admin.create_member(identity.identity(), draft).await {
        Ok(member) => (StatusCode::CREATED, Json(dto::member_to_json(&member))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn update_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
    Json(draft): Json<MemberDraft>,
) -> axum::response::Response {
    let id = match parse_member_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .admin
        .update_member(identity.identity(), &id, draft)
        .await
    {
        Ok(member) => (StatusCode::OK, Json(dto::member_to_json(&member))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

/// Delete a member; cascades to their inventory entries and registries.
pub async fn delete_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_member_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.admin.delete_member(identity.identity(), &id).await {
        Ok(report) => (StatusCode::OK, Json(dto::cascade_to_json(&report))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn assign_rank(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AssignRankRequest>,
) -> axum::response::Response {
    let id = match parse_member_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let rank = match body.rank_id {
        Some(raw) => match raw.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_id",
                    "invalid rank id",
                );
            }
        },
        None => None,
    };

    match services
        .admin
        .assign_rank(identity.identity(), &id, rank)
        .await
    {
        Ok(member) => (StatusCode::OK, Json(dto::member_to_json(&member))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn member_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_member_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.admin.member_inventory(&id).await {
        Ok(view) => (StatusCode::OK, Json(dto::inventory_view_to_json(&view))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn member_registries(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_member_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store.registries_for_member(&id).await {
        Ok(registries) => {
            let registries: Vec<_> = registries.iter().map(dto::registry_to_json).collect();
            (
                StatusCode::OK,
                Json(serde_json::json!({ "registries": registries })),
            )
                .into_response()
        }
        Err(e) => errors::app_error_to_response(e.into()),
    }
}
