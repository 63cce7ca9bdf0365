//! photure-auth (Identity Verifier) - Bearer credential verification
//!
//! Stateless per request: each `POST /verify` resolves one credential
//! against the token table loaded at startup.

use anyhow::Result;
use photure_auth::{build_router, parse_token_table, AppState};
use photure_common::Settings;
use std::net::SocketAddr;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Photure Identity Verifier (photure-auth) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let settings = Settings::from_env()?;
    let tokens = parse_token_table(&settings.auth_tokens);
    if tokens.is_empty() {
        warn!("AUTH_TOKENS is not configured; all requests will fail.");
    } else {
        info!("Loaded {} tokens", tokens.len());
    }

    let state = AppState::new(tokens, settings.environment);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.auth_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("photure-auth listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
