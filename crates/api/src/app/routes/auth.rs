use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::services::{AppServices, SignInError};
use crate::app::{dto, errors};

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.sessions.sign_in(&body.email, &body.password) {
        Ok(grant) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "token": grant.token,
                "user_id": grant.claims.sub.to_string(),
                "email": grant.claims.email,
                "expires_at": grant.claims.expires_at.to_rfc3339(),
            })),
        )
            .into_response(),
        Err(SignInError::InvalidCredentials) => errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "email or password is incorrect",
        ),
        Err(SignInError::Token(e)) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "token_error",
            e.to_string(),
        ),
    }
}

/// Sessions are stateless tokens; sign-out is the client discarding its
/// token. The endpoint exists so clients have an explicit hook.
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}
