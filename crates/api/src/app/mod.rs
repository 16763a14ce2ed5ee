//! HTTP application wiring (axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: infrastructure wiring (store, cache, notifier,
//!   services) + the session broker behind the login route
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Static configuration for one process, read from the environment by
/// `main.rs` (tests construct it directly).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    pub webhook_url: Option<String>,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(&config).await?);
    let auth_state = middleware::AuthState {
        sessions: services.sessions.clone(),
    };

    // Protected routes: require a verified session token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/login", post(routes::auth::login))
        .merge(protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new()))
}
