//! HTTP request handlers for the astrosearch API.
//!
//! This module contains all the endpoint handlers for the web server.

pub mod gate;
pub mod registry;

pub use gate::{forbidden_handler, readiness_gate};
pub use registry::{
    facility_count_handler, location_handler, search_handler, update_date_handler,
};
