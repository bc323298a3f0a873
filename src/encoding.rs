//! JSON rendering of query results.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::{RegistryError, Result};

/// Serialize `value` into a complete `200 OK` JSON response
pub fn json_response<T: Serialize + ?Sized>(value: &T) -> Result<Response> {
    let body = to_json_string(value)?;
    Ok((
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response())
}

/// Serialize `value` as compact JSON, failing with [`RegistryError::Encoding`]
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|_| RegistryError::Encoding)
}
