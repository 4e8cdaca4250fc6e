//! Request logging middleware
//!
//! Every request gets a trace id (taken from `x-trace-id` / `x-request-id`
//! when the caller sent one), runs inside an `http_request` span carrying it,
//! and has it echoed back on the response.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Accepted as an alias of [`TRACE_ID_HEADER`]
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Trace id, also available to handlers as a request extension
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceId(pub String);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reuse a caller-supplied id, or mint a fresh one
    pub fn from_headers(headers: &HeaderMap) -> Self {
        [TRACE_ID_HEADER, REQUEST_ID_HEADER]
            .iter()
            .filter_map(|name| headers.get(*name))
            .filter_map(|value| value.to_str().ok())
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub async fn log_request(mut request: Request, next: Next) -> Response<Body> {
    let start = Instant::now();
    let trace_id = TraceId::from_headers(request.headers());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or("-").to_string();

    request.extensions_mut().insert(trace_id.clone());

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %method,
        path = %path,
    );

    let mut response = async {
        tracing::info!(query = %query, "Incoming request");
        next.run(request).await
    }
    .instrument(span.clone())
    .await;

    let status = response.status().as_u16();
    let duration_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);

    span.in_scope(|| {
        if response.status().is_server_error() {
            tracing::error!(status, duration_ms = %duration_ms, "Server error");
        } else if response.status().is_client_error() {
            tracing::warn!(status, duration_ms = %duration_ms, "Client error");
        } else {
            tracing::info!(status, duration_ms = %duration_ms, "Request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
        response.headers_mut().insert(TRACE_ID_HEADER, value.clone());
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
