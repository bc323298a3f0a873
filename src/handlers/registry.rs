//! Registry lookup endpoints under `/api`.
//!
//! All handlers run behind the readiness gate, so the catalog is published
//! by the time they execute.

use axum::extract::{RawQuery, State};
use axum::response::Response;
use percent_encoding::percent_decode_str;
use serde_json::json;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::encoding::json_response;
use crate::error::{ApiError, RegistryError};
use crate::logging::{generate_request_id, log_request_error};
use crate::state::{AppState, Catalog, ServiceState};

/// Decoded query string; the last occurrence of a key wins
pub type QueryParams = HashMap<String, String>;

/// Parse a raw query string into [`QueryParams`].
///
/// Items without `=` carry no value and are dropped, as are items whose key
/// or value is not valid percent-encoded UTF-8. `+` stays a literal plus.
pub fn parse_query(raw: Option<&str>) -> QueryParams {
    let mut params = QueryParams::new();
    for item in raw.unwrap_or_default().split('&') {
        let Some((key, value)) = item.split_once('=') else {
            continue;
        };
        if let (Some(key), Some(value)) = (decode_component(key), decode_component(value)) {
            params.insert(key, value);
        }
    }
    params
}

fn decode_component(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let well_formed = bytes
        .iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b'%')
        .all(|(i, _)| {
            bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
        });
    if !well_formed {
        return None;
    }
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

/// Handle GET /api/updateDate requests
pub async fn update_date_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    respond(&state, "/api/updateDate", None, |catalog| {
        json_response(&json!({ "last_updated": catalog.last_update_time() }))
    })
}

/// Handle GET /api/numberOfObservingFacilities requests
pub async fn facility_count_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    respond(&state, "/api/numberOfObservingFacilities", None, |catalog| {
        json_response(&json!({ "number_of_fascilities": catalog.facility_count() }))
    })
}

/// Handle GET /api/search?name=... requests
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let params = parse_query(query.as_deref());
    let name = required(&params, "name")?;
    respond(&state, "/api/search", Some(name), |catalog| {
        json_response(&catalog.search_by_name(name))
    })
}

/// Handle GET /api/location?uuid=... requests
pub async fn location_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let params = parse_query(query.as_deref());
    let uuid = required(&params, "uuid")?.to_string();
    let expose = state.expose_errors();

    // Two sequential file reads; keep them off the async workers.
    tokio::task::spawn_blocking(move || {
        respond(&state, "/api/location", Some(uuid.as_str()), |catalog| {
            json_response(&catalog.location(&uuid)?)
        })
    })
    .await
    .unwrap_or_else(|e| {
        error!(endpoint = "/api/location", error = %e, "Location lookup task failed");
        Err(ApiError::internal(RegistryError::Unknown.to_string(), expose))
    })
}

fn required<'a>(params: &'a QueryParams, name: &'static str) -> Result<&'a str, ApiError> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or(ApiError::MissingParameter(name))
}

/// Run a query against the published catalog, logging and mapping failures
fn respond<F>(
    state: &AppState,
    endpoint: &str,
    param: Option<&str>,
    query: F,
) -> Result<Response, ApiError>
where
    F: FnOnce(&Catalog) -> Result<Response, RegistryError>,
{
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = endpoint,
        request_id = %request_id,
        param = param.unwrap_or("none"),
        "Processing registry request"
    );

    let catalog = match state.readiness.state() {
        ServiceState::Ready(catalog) => catalog,
        ServiceState::NotReady => return Err(ApiError::NotReady),
        ServiceState::InitError(reason) => {
            return Err(ApiError::internal(reason, state.expose_errors()))
        }
    };

    match query(catalog) {
        Ok(response) => {
            info!(
                endpoint = endpoint,
                request_id = %request_id,
                duration_us = start_time.elapsed().as_micros() as u64,
                "Registry request successful"
            );
            Ok(response)
        }
        Err(e) => {
            log_request_error(&e, endpoint, &request_id, param);
            Err(ApiError::internal(e.to_string(), state.expose_errors()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::locator::ResourceLocator;
    use crate::schema::{DirectoryIndex, FacilityReference};
    use axum::http::StatusCode;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn ready_state(root: &std::path::Path) -> Arc<AppState> {
        let mut config = Config::default();
        config.data.expose_errors = true;
        let state = AppState::new_shared(config);
        let catalog = Catalog {
            locator: ResourceLocator::new(root, "0.2.0-alpha.1".parse().unwrap()).unwrap(),
            directory: DirectoryIndex {
                last_update: Utc.with_ymd_and_hms(2022, 12, 31, 23, 0, 0).unwrap(),
            },
            references: vec![FacilityReference::new(Uuid::new_v4(), "Keck Observatory")],
        };
        assert!(state.readiness.publish(Ok(catalog)));
        state
    }

    #[test]
    fn test_required_parameter() {
        let mut params = QueryParams::new();
        assert_eq!(
            required(&params, "name"),
            Err(ApiError::MissingParameter("name"))
        );
        params.insert("name".to_string(), "keck".to_string());
        assert_eq!(required(&params, "name"), Ok("keck"));
    }

    #[test]
    fn test_parse_query() {
        let params = parse_query(Some("name=Keck%20Obs&uuid=a+b&name=VLA"));
        assert_eq!(params.get("name").map(String::as_str), Some("VLA"));
        assert_eq!(params.get("uuid").map(String::as_str), Some("a+b"));

        let params = parse_query(Some("name=&uuid"));
        assert_eq!(params.get("name").map(String::as_str), Some(""));
        assert!(!params.contains_key("uuid"));

        assert!(parse_query(None).is_empty());
        assert!(parse_query(Some("")).is_empty());
    }

    #[test]
    fn test_parse_query_drops_bad_encoding() {
        for raw in ["name=%ZZ", "name=%", "name=abc%2", "name=%FF", "%ZZ=keck"] {
            assert!(parse_query(Some(raw)).is_empty(), "query {raw:?}");
        }
        let params = parse_query(Some("name=%ZZ&uuid=%41%2b"));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("uuid").map(String::as_str), Some("A+"));
    }

    #[tokio::test]
    async fn test_update_date_handler() {
        let root = tempfile::tempdir().unwrap();
        let state = ready_state(root.path());
        let response = update_date_handler(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_location_handler_maps_errors() {
        let root = tempfile::tempdir().unwrap();
        let state = ready_state(root.path());

        let query = format!("uuid={}", Uuid::new_v4());
        let Err(error) = location_handler(State(state), RawQuery(Some(query))).await else {
            panic!("lookup of an unknown facility succeeded");
        };
        assert_eq!(error, ApiError::internal("Parse PolisFacility failed", true));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_handlers_refuse_unpublished_state() {
        let state = AppState::new_shared(Config::default());
        let Err(error) = facility_count_handler(State(state)).await else {
            panic!("handler answered before the catalog was published");
        };
        assert_eq!(error, ApiError::NotReady);
    }
}
