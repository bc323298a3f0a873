//! Readiness gate and request policy applied in front of every route.

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppState, ServiceState};

/// Check the service state and the request method before routing.
///
/// Every response leaves with `Connection: close`: one request per connection.
pub async fn readiness_gate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let rejection = match state.readiness.state() {
        ServiceState::NotReady => Some(ApiError::NotReady),
        ServiceState::InitError(reason) => {
            Some(ApiError::internal(reason, state.expose_errors()))
        }
        ServiceState::Ready(_) if request.method() != Method::GET => Some(ApiError::Forbidden),
        ServiceState::Ready(_) => None,
    };

    let mut response = match rejection {
        Some(error) => {
            debug!(
                method = %request.method(),
                uri = %request.uri(),
                error = %error,
                "Request rejected before routing"
            );
            error.into_response()
        }
        None => next.run(request).await,
    };

    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}

/// Fallback for every path outside the API table
pub async fn forbidden_handler() -> ApiError {
    ApiError::Forbidden
}
