//! Error types for the astrosearch application.
//!
//! [`RegistryError`] covers everything that can go wrong while loading the
//! mirror or resolving a query against it. [`ApiError`] is the request-level
//! error that the router turns into an HTTP response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body sent while the mirror is still being acquired.
pub const NOT_READY_MESSAGE: &str = "Service not yet ready (data downloading...)";

/// Body sent for internal errors when error details are not exposed.
pub const REDACTED_MESSAGE: &str = "Unknown error";

/// The main error type for registry operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The schema version token could not be parsed
    #[error("Init Polis version failed")]
    VersionInit,

    /// The mirror root cannot back a resource locator
    #[error("Init PolisFileResourceFinder failed")]
    ResourceLocator,

    /// The top-level directory file is missing or malformed
    #[error("Parse PolisDirectory failed")]
    DirectoryParse,

    /// The facility reference listing is missing or malformed
    #[error("Parse PolisFacilitiesDirectory failed")]
    FacilitiesParse,

    /// A facility file is missing or malformed
    #[error("Parse PolisFacility failed")]
    FacilityParse,

    /// The facility record carries no location id
    #[error("No location for PolisFacility")]
    MissingLocation,

    /// A location file is missing or malformed
    #[error("Parse PolisObservingFacilityLocation failed")]
    LocationParse,

    /// A result could not be rendered as JSON
    #[error("Data encoding failed")]
    Encoding,

    /// A failure with no more specific reason, such as a panicked task
    #[error("Unknown error")]
    Unknown,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Server errors
    #[error("Server error: {message}")]
    Server { message: String },
}

/// Convenience type alias for Results with RegistryError
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Request-level failures, rendered as plain-text responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The mirror has not been published yet
    #[error("{}", NOT_READY_MESSAGE)]
    NotReady,

    /// Wrong method or unknown path
    #[error("Forbidden")]
    Forbidden,

    /// A required query parameter is absent
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// Initialization or query failure; the flag controls whether the reason
    /// reaches the client
    #[error("{reason}")]
    Internal { reason: String, expose: bool },
}

impl ApiError {
    /// Build an internal error from a reason, redacting it unless `expose` is set
    pub fn internal(reason: impl Into<String>, expose: bool) -> Self {
        Self::Internal {
            reason: reason.into(),
            expose,
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            // A transient, expected state: not reported as a server failure.
            Self::NotReady => StatusCode::OK,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body sent to the client
    pub fn body(&self) -> String {
        match self {
            Self::Internal { expose: false, .. } => REDACTED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.body()).into_response()
    }
}
