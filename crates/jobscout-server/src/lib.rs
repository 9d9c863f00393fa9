//! jobscout HTTP API
//!
//! Serves normalized LinkedIn job search results over HTTP.
//!
//! # Endpoints
//!
//! - `GET /api/search` - paged job search, rate limited per client
//! - `GET /health` - liveness probe
//!
//! Search responses are JSON arrays of postings. Callers over their quota
//! get `429 Too Many Requests` with a `RATE_LIMITED` body.

pub mod app;
pub mod config;
pub mod middleware;
pub mod routes;

pub use app::{AppState, build_app};
pub use config::Config;
