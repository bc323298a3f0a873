//! # astrosearch
//!
//! A read-only HTTP lookup service over a locally mirrored POLIS
//! observatory registry.
//!
//! The service starts answering immediately. Until the local mirror has been
//! fetched and parsed every request gets a "not ready" reply; once the
//! registry is published, four endpoints query it.
//!
//! ## Architecture
//!
//! - **Acquisition**: mirrors the remote registry if needed, then runs the readiness build once
//! - **Data Layer**: resource locator, POLIS record decoding and the published catalog
//! - **Query Engine**: in-memory catalog lookups plus on-demand facility/location reads
//! - **API Layer**: readiness gate, routing and plain-text/JSON responses

pub mod acquisition;
pub mod config;
pub mod data_loader;
pub mod encoding;
pub mod error;
pub mod fetcher;
pub mod handlers;
pub mod locator;
pub mod logging;
pub mod query;
pub mod router;
pub mod schema;
pub mod state;

pub use acquisition::AcquisitionController;
pub use config::Config;
pub use error::{ApiError, RegistryError, Result};
pub use fetcher::{BulkFetcher, WgetFetcher};
pub use logging::{create_http_trace_layer, generate_request_id, init_tracing};
pub use query::Coordinates;
pub use router::build_router;
pub use state::{AppState, Catalog, Readiness, ServiceState};
