//! Request timing middleware.
//!
//! Move and analysis requests wait on the engine, so only requests slower
//! than [`SLOW_REQUEST_MS`] are reported as warnings.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Requests taking longer than this are logged at `warn`.
pub const SLOW_REQUEST_MS: u128 = 2_000;

/// Middleware that logs request timing.
///
/// Logs slow requests as warnings and normal requests as debug.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware};
/// use coach_server::middleware::timing_layer;
///
/// let app = Router::new()
///     .route("/api/example", get(handler))
///     .layer(middleware::from_fn(timing_layer));
/// ```
pub async fn timing_layer(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status().as_u16();

    if duration.as_millis() > SLOW_REQUEST_MS {
        tracing::warn!(
            method = %method,
            path = %uri,
            status = status,
            duration_ms = duration.as_millis(),
            "Slow request"
        );
    } else {
        tracing::debug!(
            method = %method,
            path = %uri,
            status = status,
            duration_ms = duration.as_millis(),
            "Request completed"
        );
    }

    response
}
