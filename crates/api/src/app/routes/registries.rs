use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use lootledger_core::{ItemId, RegistryId};
use lootledger_registry::{SubmissionInput, SubmissionLine};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(submit_registry))
        .route("/:id", get(get_registry))
        .route("/sweep", post(sweep_pending))
}

/// Submit a loot registry: grants inventory and announces the payout.
pub async fn submit_registry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<dto::SubmitRegistryRequest>,
) -> axum::response::Response {
    let member_id = match body.member_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid member id");
        }
    };

    let mut lines = Vec::with_capacity(body.lines.len());
    for line in body.lines {
        let item_id: ItemId = match line.item_id.parse() {
            Ok(v) => v,
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_id",
                    format!("invalid item id '{}'", line.item_id),
                );
            }
        };
        lines.push(SubmissionLine {
            item_id,
            quantity: line.quantity,
        });
    }

    let identity = identity.identity();
    let input = SubmissionInput {
        author_id: identity.user_id,
        author_name: identity.email.clone(),
        member_id,
        activity: body.activity,
        lines,
    };

    match services.submission.submit(input).await {
        Ok(outcome) => (StatusCode::CREATED, Json(dto::outcome_to_json(&outcome))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn get_registry(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RegistryId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid registry id");
        }
    };

    match services.store.get_registry(&id).await {
        Ok(Some(registry)) => {
            (StatusCode::OK, Json(dto::registry_to_json(&registry))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "registry not found"),
        Err(e) => errors::app_error_to_response(e.into()),
    }
}

/// Admin-triggered sweep over unannounced registries.
pub async fn sweep_pending(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<dto::SweepRequest>,
) -> axum::response::Response {
    match services
        .submission
        .process_pending(identity.identity(), body.limit)
        .await
    {
        Ok(report) => (StatusCode::OK, Json(dto::sweep_to_json(&report))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}
