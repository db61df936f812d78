mod app;
mod cache;
mod config;
mod customers;
mod db;
mod images;
mod state;
mod storage;
#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "customers_dashboard=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;
    tracing::info!(
        public_dir = %app_state.config.storage.public_dir.display(),
        images_prefix = %app_state.config.storage.images_prefix,
        "customer image storage ready"
    );

    let addr = app_state.config.listen_addr;
    app::serve(app::build_app(app_state), addr).await
}
