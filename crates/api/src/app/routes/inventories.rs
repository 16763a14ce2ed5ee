use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use lootledger_core::{ItemId, MemberId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(search_inventories))
        .route("/owners/:item_id", get(item_owners))
        .route("/:member_id/:item_id/adjust", post(adjust_inventory))
}

/// Valued inventory views; `?q=` filters by member name or held item name.
pub async fn search_inventories(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let query = params.get("q").map(String::as_str).unwrap_or("");
    let views: Vec<_> = services
        .admin
        .search_inventories(query)
        .await
        .iter()
        .map(dto::inventory_view_to_json)
        .collect();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "inventories": views })),
    )
        .into_response()
}

/// Who currently holds at least one unit of the item.
pub async fn item_owners(
    Extension(services): Extension<Arc<AppServices>>,
    Path(item_id): Path<String>,
) -> axum::response::Response {
    let item_id: ItemId = match item_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id");
        }
    };

    let owners: Vec<String> = services
        .admin
        .item_owners(&item_id)
        .await
        .iter()
        .map(|m| m.to_string())
        .collect();
    (StatusCode::OK, Json(serde_json::json!({ "owners": owners }))).into_response()
}

/// Manual correction on one (member, item) pair.
pub async fn adjust_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path((member_id, item_id)): Path<(String, String)>,
    Json(body): Json<dto::AdjustInventoryRequest>,
) -> axum::response::Response {
    let member_id: MemberId = match member_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid member id");
        }
    };
    let item_id: ItemId = match item_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id");
        }
    };

    match services
        .admin
        .adjust_inventory(identity.identity(), &member_id, &item_id, body.delta)
        .await
    {
        Ok(quantity) => (
            StatusCode::OK,
            Json(serde_json::json!({ "quantity": quantity })),
        )
            .into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}
