use lootledger_api::app::AppConfig;

#[tokio::main]
async fn main() {
    lootledger_observability::init();

    let token_secret = std::env::var("LOOTLEDGER_TOKEN_SECRET").unwrap_or_else(|_| {
        tracing::warn!("LOOTLEDGER_TOKEN_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });
    let admin_email = std::env::var("LOOTLEDGER_ADMIN_EMAIL").unwrap_or_else(|_| {
        tracing::warn!("LOOTLEDGER_ADMIN_EMAIL not set; seeding admin@localhost");
        "admin@localhost".to_string()
    });
    let admin_password = std::env::var("LOOTLEDGER_ADMIN_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!("LOOTLEDGER_ADMIN_PASSWORD not set; using insecure dev default");
        "admin".to_string()
    });
    let webhook_url = std::env::var("DISCORD_WEBHOOK_URL").ok();

    let config = AppConfig {
        token_secret,
        admin_email,
        admin_password,
        webhook_url,
    };

    let app = lootledger_api::app::build_app(config)
        .await
        .expect("failed to build application");

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
