use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};

use lootledger_catalog::ItemDraft;
use lootledger_core::ItemId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(upsert_item))
        .route("/:id", delete(delete_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let snapshot = services.cache.snapshot();
    let items: Vec<_> = snapshot.items_sorted().into_iter().map(dto::item_to_json).collect();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn upsert_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(draft): Json<ItemDraft>,
) -> axum::response::Response {
    match services.admin.upsert_item(identity.identity(), draft).await {
        Ok(item) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id");
        }
    };

    match services.admin.delete_item(identity.identity(), &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}
