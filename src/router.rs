//! Axum router construction for the astrosearch API.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::handlers::{
    facility_count_handler, forbidden_handler, location_handler, readiness_gate, search_handler,
    update_date_handler,
};
use crate::logging::create_http_trace_layer;
use crate::state::AppState;

/// The fixed API table
pub const API_ROUTES: [&str; 4] = [
    "/api/updateDate",
    "/api/numberOfObservingFacilities",
    "/api/search",
    "/api/location",
];

/// Build the complete router.
///
/// - `GET /api/updateDate` -- last registry update
/// - `GET /api/numberOfObservingFacilities` -- size of the catalog
/// - `GET /api/search?name=` -- ids of facilities whose name contains `name`
/// - `GET /api/location?uuid=` -- latitude/longitude of one facility
///
/// The readiness gate wraps every route and the fallback, so the service
/// state is checked before method, path and parameters.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(API_ROUTES[0], get(update_date_handler).fallback(forbidden_handler))
        .route(API_ROUTES[1], get(facility_count_handler).fallback(forbidden_handler))
        .route(API_ROUTES[2], get(search_handler).fallback(forbidden_handler))
        .route(API_ROUTES[3], get(location_handler).fallback(forbidden_handler))
        .fallback(forbidden_handler)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            readiness_gate,
        ))
        .layer(create_http_trace_layer())
        .with_state(state)
}
