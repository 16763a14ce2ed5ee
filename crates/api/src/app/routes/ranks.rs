use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};

use lootledger_core::RankId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_ranks).post(upsert_rank))
        .route("/:id", delete(delete_rank))
}

pub async fn list_ranks(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let snapshot = services.cache.snapshot();
    let ranks: Vec<_> = snapshot.ranks_sorted().into_iter().map(dto::rank_to_json).collect();
    (StatusCode::OK, Json(serde_json::json!({ "ranks": ranks }))).into_response()
}

pub async fn upsert_rank(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<dto::UpsertRankRequest>,
) -> axum::response::Response {
    let id: RankId = match body.id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid rank id");
        }
    };

    match services
        .admin
        .upsert_rank(identity.identity(), id, body.draft)
        .await
    {
        Ok(rank) => (StatusCode::OK, Json(dto::rank_to_json(&rank))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn delete_rank(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RankId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid rank id");
        }
    };

    match services.admin.delete_rank(identity.identity(), &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}
