//! Rank insight HTTP server binary.
//!
//! Loads configuration, sets up the in-memory session store and the
//! language model client, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! ANTHROPIC_API_KEY=sk-... cargo run --bin rank-insight-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `ANTHROPIC_API_KEY`: Language model credential (analysis endpoints fail without it)
//! - `ANTHROPIC_MODEL`, `ANTHROPIC_BASE_URL`: Model overrides
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rank_insight::config::AppConfig;
use rank_insight::db::{LocalRepository, SessionRepository};
use rank_insight::http::{create_router, AppState};
use rank_insight::services::{AnalysisError, AnthropicClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting rank insight server");

    let config = AppConfig::load().context("Failed to load configuration")?;
    let limits = config.server.session_limits();
    info!(
        max_sessions = ?limits.max_sessions,
        ttl_minutes = ?limits.ttl.map(|ttl| ttl.num_minutes()),
        "Session store limits"
    );
    let repository =
        Arc::new(LocalRepository::with_limits(limits)) as Arc<dyn SessionRepository>;

    let mut state = AppState::new(repository, config.clone());
    match AnthropicClient::new(config.llm.clone()) {
        Ok(client) => {
            info!(model = client.model(), "Language model client configured");
            state = state.with_model(Arc::new(client));
        }
        Err(AnalysisError::MissingCredential) => {
            warn!("No language model credential; analysis endpoints are disabled");
        }
        Err(e) => return Err(anyhow::anyhow!(e)),
    }

    let app = create_router(state);

    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .context("Invalid bind address")?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
