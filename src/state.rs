//! Service state shared by all handlers.
//!
//! The readiness gate is a write-once cell. Until it is set the service is
//! `NotReady`; the single `set` publishes either the whole [`Catalog`] or the
//! initialization failure, and it never changes afterwards.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::config::Config;
use crate::error::RegistryError;
use crate::locator::ResourceLocator;
use crate::schema::{DirectoryIndex, FacilityReference};

/// Everything the readiness build produces, published as one value
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Locator bound to the mirror root and schema version
    pub locator: ResourceLocator,
    /// Top-level directory record
    pub directory: DirectoryIndex,
    /// Facility references in load order
    pub references: Vec<FacilityReference>,
}

/// Outcome stored by the one-time publish
#[derive(Debug)]
enum Published {
    Ready(Catalog),
    Failed(String),
}

/// Observable service state
#[derive(Debug, Clone, Copy)]
pub enum ServiceState<'a> {
    NotReady,
    Ready(&'a Catalog),
    InitError(&'a str),
}

/// Write-once readiness gate
#[derive(Debug, Default)]
pub struct Readiness {
    cell: OnceCell<Published>,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, as seen by a request
    pub fn state(&self) -> ServiceState<'_> {
        match self.cell.get() {
            None => ServiceState::NotReady,
            Some(Published::Ready(catalog)) => ServiceState::Ready(catalog),
            Some(Published::Failed(reason)) => ServiceState::InitError(reason),
        }
    }

    /// Publish the readiness build outcome. Returns `false` if a state was
    /// already published, in which case the new outcome is dropped.
    pub fn publish(&self, outcome: Result<Catalog, RegistryError>) -> bool {
        let published = match outcome {
            Ok(catalog) => Published::Ready(catalog),
            Err(e) => Published::Failed(e.to_string()),
        };
        self.cell.set(published).is_ok()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state(), ServiceState::Ready(_))
    }
}

/// The main application state shared across all handlers
#[derive(Debug)]
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Readiness gate holding the published catalog
    pub readiness: Readiness,
}

impl AppState {
    /// Create a new AppState that is not ready yet
    pub fn new(config: Config) -> Self {
        Self {
            config,
            readiness: Readiness::new(),
        }
    }

    /// Create a new AppState wrapped in an Arc for shared ownership
    pub fn new_shared(config: Config) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// Whether internal error reasons are sent to clients
    pub fn expose_errors(&self) -> bool {
        self.config.data.expose_errors
    }
}
