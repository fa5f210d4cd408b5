// =============================================================================
// Carbon Market Analytics — Main Entry Point
// =============================================================================
//
// Serves the analytics REST API and keeps a 15-minute refresh loop running
// alongside it. Market data is fed through the API or preloaded from the
// configured seed file.
// =============================================================================

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use carbon_market_analytics::api;
use carbon_market_analytics::app_state::AppState;
use carbon_market_analytics::refresh::run_refresh_loop;
use carbon_market_analytics::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Carbon Market Analytics — Starting Up             ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config_path = std::env::var("ANALYTICS_CONFIG_PATH")
        .unwrap_or_else(|_| "analytics_config.json".into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, path = %config_path, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(addr) = std::env::var("ANALYTICS_BIND_ADDR") {
        config.bind_addr = addr;
    }

    // ── 2. Shared state & seed data ──────────────────────────────────────
    let seed_file = config.seed_file.clone();
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));

    if let Some(path) = seed_file {
        if let Err(e) = state.store.load_seed(&path) {
            warn!(error = %e, "Seed file not loaded, starting with an empty market");
        }
    }

    // ── 3. Refresh loop (every 15 minutes) ───────────────────────────────
    tokio::spawn(run_refresh_loop(state.clone()));

    // ── 4. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server failed");
        }
    });

    info!("All subsystems running. Press Ctrl+C to stop.");

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping gracefully");
    server.abort();

    info!(
        state_version = state.current_state_version(),
        "Carbon Market Analytics shut down complete."
    );
    Ok(())
}
