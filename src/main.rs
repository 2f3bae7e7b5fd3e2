// src/main.rs

use std::net::SocketAddr;

use dotenvy::dotenv;
use skillend::chat;
use skillend::config::Config;
use skillend::routes;
use skillend::state::AppState;
use skillend::store::{FileBackend, Store};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Open the store file; an unusable file degrades to in-memory only
    // rather than refusing to start.
    let store = match FileBackend::open(&config.store_path).await {
        Ok(backend) => {
            tracing::info!("Store file opened at {}", config.store_path);
            Store::new(backend)
        }
        Err(e) => {
            tracing::warn!(
                "Could not open store file '{}' ({}); running in-memory only",
                config.store_path,
                e
            );
            Store::in_memory()
        }
    };

    let shutdown = CancellationToken::new();
    let state = AppState::new(store, config.clone(), shutdown.clone());

    // Seed Demo User
    if let Err(e) = state.sessions.seed_demo_user().await {
        tracing::error!("Failed to seed demo user: {:?}", e);
    }

    // Background chat simulator
    if config.chat_simulator {
        chat::spawn_simulator(state.store.clone(), shutdown.clone());
        tracing::info!("Chat simulator running");
    }

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .expect("SKILLEND_ADDR must be a valid socket address");
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server; Ctrl-C cancels every pending timer before exit.
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
            shutdown.cancel();
        })
        .await
        .unwrap();
}
