//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Creates a tracing middleware for HTTP requests.
///
/// Opens an `INFO` span per request (method, URI, version). Everything the
/// cache handle logs while serving the request is recorded inside that span,
/// so hits, misses and bypasses can be tied to the request that caused them.
///
/// Responses are logged at `INFO` with status and latency in milliseconds.
/// 5xx responses (cache not connected, store errors) are additionally logged
/// at `WARN`.
///
/// # Example Logs
///
/// ```text
/// DEBUG request{method=GET uri=/entries/user:42 version=HTTP/1.1}: request_cache::application::handle: Cache HIT: user:42
/// INFO request{method=GET uri=/entries/user:42 version=HTTP/1.1}: finished processing request latency=2 ms status=200
/// WARN request{method=GET uri=/entries/user:42 version=HTTP/1.1}: response failed classification=Status code: 503 Service Unavailable latency=0 ms
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::WARN)
                .latency_unit(LatencyUnit::Millis),
        )
}
