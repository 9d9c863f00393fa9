//! Application setup and router configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, middleware, routing::get};
use jobscout_core::{ClientConfig, JobScraper, JobsClient, PacingPolicy, RateGovernor};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::rate_limit;
use crate::routes::{health_handler, search_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<JobScraper>,
    pub governor: Arc<RateGovernor>,
}

impl AppState {
    pub fn new(scraper: JobScraper, governor: RateGovernor) -> Self {
        Self {
            scraper: Arc::new(scraper),
            governor: Arc::new(governor),
        }
    }

    /// Wire the real upstream client, pacing and governor from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = JobsClient::with_config(ClientConfig {
            timeout_secs: config.upstream_timeout_secs,
            ..ClientConfig::default()
        })
        .context("Failed to build upstream HTTP client")?;

        let scraper =
            JobScraper::with_fetcher(Arc::new(client), PacingPolicy::new(config.page_delay));
        let governor = RateGovernor::new(config.governor.clone());

        Ok(Self::new(scraper, governor))
    }
}

/// Build the Axum application router
///
/// The rate limit is a route layer on the search route only; the health
/// probe is never counted.
pub fn build_app(state: AppState) -> Router {
    let search = Router::new()
        .route("/api/search", get(search_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .merge(search)
        .route("/health", get(health_handler))
        .layer(CorsLayer::new().allow_origin(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
