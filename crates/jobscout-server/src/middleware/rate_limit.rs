// Per-client rate limiting for the search route
//
// Applied in app.rs as a route layer on /api/search only. Every request
// counts toward the caller's window, including the denied ones.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, SecondsFormat, Utc};
use jobscout_core::Decision;
use serde::Serialize;

use super::client_ip::client_id;
use crate::app::AppState;

/// Body of a 429 response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitedBody {
    pub error: &'static str,
    pub message: String,
    pub retry_after_seconds: u64,
    /// RFC 3339 UTC timestamp when the window resets
    pub block_until: String,
}

pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_id(request.headers(), peer);

    match state.governor.admit(&client) {
        Decision::Allow => next.run(request).await,
        Decision::Deny {
            retry_after_seconds,
            reset_at,
        } => {
            tracing::warn!(client = %client, retry_after_seconds, "search rate limited");
            let body = RateLimitedBody::new(
                state.governor.max_requests(),
                state.governor.window(),
                retry_after_seconds,
                reset_at,
            );
            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after_seconds));
            response
        }
    }
}

impl RateLimitedBody {
    pub fn new(
        max_requests: u32,
        window: Duration,
        retry_after_seconds: u64,
        reset_at: DateTime<Utc>,
    ) -> Self {
        let mins = retry_after_seconds / 60;
        let secs = retry_after_seconds % 60;

        Self {
            error: "RATE_LIMITED",
            message: format!(
                "You have exceeded the limit of {} requests per {} from this IP. \
                 You can try again in {} min {} sec (until {}).",
                max_requests,
                window_label(window),
                mins,
                secs,
                reset_at.format("%H:%M:%S UTC"),
            ),
            retry_after_seconds,
            block_until: reset_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Human wording for a window length ("hour", "30 minutes", ...)
fn window_label(window: Duration) -> String {
    let secs = window.as_secs();
    match secs {
        3600 => "hour".to_string(),
        60 => "minute".to_string(),
        s if s > 0 && s % 3600 == 0 => format!("{} hours", s / 3600),
        s if s > 0 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "second".to_string(),
        s => format!("{} seconds", s),
    }
}
