use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{
        IntoResponse,
        sse::{Event as SseEvent, KeepAlive, Sse},
    },
};
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use crate::app::services::AppServices;
use crate::context::IdentityContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(identity): Extension<IdentityContext>) -> impl IntoResponse {
    let identity = identity.identity();
    Json(serde_json::json!({
        "user_id": identity.user_id.to_string(),
        "email": identity.email,
    }))
}

/// SSE feed of store changes — the push channel the admin screens keep
/// their lists fresh with. Lagged consumers just miss events and should
/// re-read; the data endpoints are the source of truth.
pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.store.watch();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event("change").data(data)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
