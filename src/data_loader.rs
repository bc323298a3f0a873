//! Readiness build: loading the mirrored registry into a [`Catalog`].
//!
//! The stages run in a fixed order and the first failure decides the error
//! kind. Nothing is published until every stage has succeeded.

use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::DataConfig;
use crate::error::{RegistryError, Result};
use crate::locator::{ResourceLocator, SchemaVersion};
use crate::logging::log_build_outcome;
use crate::schema::{decode_file, DirectoryIndex, FacilitiesDirectory};
use crate::state::{Catalog, Readiness};

/// Load the registry from `mirror_root` using the given schema version token
pub fn load_catalog(mirror_root: &Path, schema_version: &str) -> Result<Catalog> {
    // Stage 1: version token and locator
    let version: SchemaVersion = schema_version.parse()?;
    let locator = ResourceLocator::new(mirror_root, version)?;
    debug!(
        mirror_root = %mirror_root.display(),
        version = %locator.version(),
        "Resource locator ready"
    );

    // Stage 2: directory index
    let directory: DirectoryIndex = decode_file(&locator.directory_file()).map_err(|e| {
        debug!("Directory decoding failed: {}", e);
        RegistryError::DirectoryParse
    })?;

    // Stage 3: facility references
    let listing: FacilitiesDirectory = decode_file(&locator.facilities_directory_file())
        .map_err(|e| {
            debug!("Facilities directory decoding failed: {}", e);
            RegistryError::FacilitiesParse
        })?;

    Ok(Catalog {
        locator,
        directory,
        references: listing.observing_facility_references,
    })
}

/// Run the readiness build once and publish its outcome
pub fn build_and_publish(readiness: &Readiness, data: &DataConfig) -> bool {
    let start = Instant::now();
    info!(mirror = %data.local_path.display(), "Starting readiness build");

    let outcome = load_catalog(&data.local_path, &data.schema_version);
    log_build_outcome(
        &data.local_path,
        &data.schema_version,
        start,
        outcome.as_ref().map(Catalog::facility_count),
    );

    let published = readiness.publish(outcome);
    if published {
        info!("Service state published");
    }
    published
}
