//! Shift Rostering - Axum Server
//!
//! Run with: cargo run
//! Bind address comes from `SHIFT_ROSTER_ADDR` (default 0.0.0.0:7860).

use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use shift_roster::api;

const DEFAULT_ADDR: &str = "0.0.0.0:7860";

#[tokio::main]
async fn main() {
    let filter = EnvFilter::from_default_env();
    let filter = match "shift_roster=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    #[cfg(feature = "console")]
    shift_roster::console::print_banner();

    let addr_str = std::env::var("SHIFT_ROSTER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let addr: SocketAddr = match addr_str.parse() {
        Ok(addr) => addr,
        Err(err) => {
            error!(addr = %addr_str, error = %err, "Invalid SHIFT_ROSTER_ADDR");
            std::process::exit(2);
        }
    };

    let state = Arc::new(api::AppState::new());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state).layer(cors);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%addr, error = %err, "Failed to bind");
            std::process::exit(1);
        }
    };
    info!(%addr, "Server listening");

    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "Server error");
        std::process::exit(1);
    }
}
