//! Common test utilities for astrosearch.
//!
//! This module provides shared utilities for testing the astrosearch server.

// Not every test binary uses every helper
#![allow(dead_code)]

pub mod http_client;
pub mod test_data;
