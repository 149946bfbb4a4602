use std::panic;
use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use collabnote::config::Config;
use collabnote::routes::build_app;
use collabnote::ws::registry::RoomRegistry;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "collabnote=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });

    // Room membership for the whole process; rooms come and go with
    // their participants.
    let registry = Arc::new(RoomRegistry::new());

    // CORS: explicit origins from config, otherwise wide open for
    // development.
    let cors = match config.cors_origins.as_deref() {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app_routes = build_app(registry).layer(cors);

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", config.server_address()));

    info!("🚀 Server running on http://{}", config.server_address());
    info!("📡 Collaboration WebSocket at ws://{}/ws", config.server_address());
    info!("📚 Swagger UI available at http://{}/swagger", config.server_address());

    axum::serve(listener, app_routes)
        .await
        .expect("Server failed to start");
}
