//! Tracing setup and the structured log events of the service.

use std::path::Path;
use std::time::Instant;
use tracing::{error, info, Level};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::error::RegistryError;

/// Span per HTTP request, response logged at debug with latency in micros
pub fn create_http_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    DefaultMakeSpan,
    DefaultOnRequest,
    DefaultOnResponse,
> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::DEBUG)
                .latency_unit(LatencyUnit::Micros),
        )
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

/// Log how the readiness build ended: facility count on success
pub fn log_build_outcome(
    mirror: &Path,
    schema_version: &str,
    started: Instant,
    outcome: Result<usize, &RegistryError>,
) {
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    match outcome {
        Ok(facility_count) => info!(
            mirror = %mirror.display(),
            schema_version = schema_version,
            facility_count = facility_count,
            duration_ms = duration_ms,
            "Registry loaded"
        ),
        Err(e) => error!(
            mirror = %mirror.display(),
            schema_version = schema_version,
            error = %e,
            duration_ms = duration_ms,
            "Registry load failed"
        ),
    }
}

/// Log a query failure with its request context
pub fn log_request_error(
    error: &RegistryError,
    endpoint: &str,
    request_id: &str,
    param: Option<&str>,
) {
    error!(
        error = %error,
        endpoint = endpoint,
        request_id = request_id,
        param = param.unwrap_or("none"),
        "Request processing error"
    );
}

pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
