use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wishlink_api::config::ServerConfig;
use wishlink_api::render::PageRenderer;
use wishlink_api::router::build_app_router;
use wishlink_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wishlink_api=debug,wishlink_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(
        host = %config.host,
        port = %config.port,
        rate_limit_policy = config.rate_limit.policy.as_str(),
        rate_limit_max = config.rate_limit.max_requests,
        "Loaded server configuration"
    );

    // --- Store ---
    let store = wishlink_store::create_store(&config.store_url)
        .await
        .expect("Failed to connect to store");
    tracing::info!("Store connection created");

    wishlink_store::health_check(store.as_ref())
        .await
        .expect("Store health check failed");
    tracing::info!("Store health check passed");

    // --- Rate limiter ---
    let rate_limiter = wishlink_store::build_rate_limiter(Arc::clone(&store), config.rate_limit);

    // --- Templates ---
    let renderer = PageRenderer::new().expect("Failed to compile page templates");

    // --- App state ---
    let state = AppState {
        store,
        rate_limiter,
        renderer: Arc::new(renderer),
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
