use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod inventories;
pub mod items;
pub mod members;
pub mod ranks;
pub mod registries;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/stream", get(system::stream))
        .route("/auth/logout", post(auth::logout))
        .nest("/items", items::router())
        .nest("/ranks", ranks::router())
        .nest("/members", members::router())
        .nest("/inventories", inventories::router())
        .nest("/registries", registries::router())
}
