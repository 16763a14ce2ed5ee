use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use lootledger_infra::AppError;

/// Map a service error onto a JSON HTTP response.
pub fn app_error_to_response(err: AppError) -> axum::response::Response {
    match err {
        AppError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AppError::Authorization(msg) => forbidden(msg),
        AppError::Persistence(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
        AppError::Notification(e) => {
            json_error(StatusCode::BAD_GATEWAY, "notifier_error", e.to_string())
        }
    }
}

/// 403 with a sign-out hint: an authenticated-but-restricted session is a
/// stuck state, so the client is told to drop it.
fn forbidden(message: impl Into<String>) -> axum::response::Response {
    (
        StatusCode::FORBIDDEN,
        axum::Json(json!({
            "error": "forbidden",
            "message": message.into(),
            "force_sign_out": true,
        })),
    )
        .into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
