//! REST API over a completed episode.
//!
//! Provides two GET endpoints:
//! - `/state` returns the scenario, episode summary, and latest step
//! - `/telemetry` returns step records with optional range filtering

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::config::ScenarioConfig;
use crate::runner::EpisodeRun;
use crate::sim::kpi::EpisodeSummary;
use crate::sim::types::StepRecord;

pub use types::{ErrorResponse, StateResponse, TelemetryQuery, TelemetryRecord};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the episode completes and wrapped in `Arc`; all
/// data is read-only.
#[derive(Debug)]
pub struct AppState {
    /// Scenario the episode ran.
    pub config: ScenarioConfig,
    /// Aggregate episode summary.
    pub summary: EpisodeSummary,
    /// Per-step records.
    pub records: Vec<StepRecord>,
}

impl From<EpisodeRun> for AppState {
    fn from(run: EpisodeRun) -> Self {
        Self {
            config: run.config,
            summary: run.summary,
            records: run.records,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/telemetry", get(handlers::get_telemetry))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
