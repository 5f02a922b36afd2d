use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use video_like_backend::{build_router, config::Config, models::AppState, store::InMemoryVideoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    // Create app state
    let store = Arc::new(InMemoryVideoStore::new());
    let app_state = Arc::new(AppState::new(store, config.clone()));

    let app = build_router(app_state);

    // Start server
    let addr = config.addr();
    info!("🚀 Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("{}", "=".repeat(60));
    println!("✅ Server running on http://{}", addr);
    println!("   Principal header: {}", config.principal_header);
    println!("   Log filter: {}", config.log_filter);
    println!("{}", "=".repeat(60));

    info!("✅ Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
