//! Flow Architect - conversational data pipeline builder
//!
//! A Rust backend that turns a natural-language prompt into a three-stage
//! source, transform, destination pipeline and configures it through a
//! guided dialogue.

mod api;
mod config;
mod flow;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use config::ServerConfig;
use runtime::DelayTimer;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flow_architect=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ServerConfig::from_env();
    let timer = DelayTimer::new(config.thinking_delay);
    tracing::info!(thinking_delay = ?timer.delay(), "Thinking timer configured");

    let state = AppState::new(Arc::new(timer));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    let addr = config.socket_addr();
    tracing::info!("Flow Architect server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
