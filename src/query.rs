//! Query engine over a published [`Catalog`].
//!
//! Directory and reference lookups are served from memory. Facility and
//! location records are read from the mirror on every call and never cached.

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{RegistryError, Result};
use crate::schema::{decode_file, FacilityRecord, LocationRecord};
use crate::state::Catalog;

/// Timestamp layout used by `/api/updateDate`
pub const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Latitude/longitude of a facility, passed through unvalidated
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Catalog {
    /// Last registry update as `YYYY-MM-DD HH:mm:ss` (UTC)
    pub fn last_update_time(&self) -> String {
        self.directory
            .last_update
            .format(LAST_UPDATE_FORMAT)
            .to_string()
    }

    /// Number of facility references
    pub fn facility_count(&self) -> usize {
        self.references.len()
    }

    /// Ids of all facilities whose name contains `needle`, ignoring case
    pub fn search_by_name(&self, needle: &str) -> Vec<Uuid> {
        let needle = needle.to_lowercase();
        self.references
            .iter()
            .filter(|r| r.name().to_lowercase().contains(&needle))
            .map(|r| r.id())
            .collect()
    }

    /// Resolve a facility and then its location record
    pub fn location(&self, facility_id: &str) -> Result<Coordinates> {
        let facility = self.facility(facility_id)?;
        let location_id = facility.location_id.ok_or(RegistryError::MissingLocation)?;

        let path = self.locator.facility_data_file(facility_id, location_id);
        let location: LocationRecord = decode_file(&path).map_err(|e| {
            debug!(path = %path.display(), "Location decoding failed: {}", e);
            RegistryError::LocationParse
        })?;

        let coordinates = Coordinates {
            latitude: location.latitude(),
            longitude: location.longitude(),
        };
        // JSON has no representation for NaN or infinities
        let representable = |v: Option<f64>| v.map_or(true, f64::is_finite);
        if !representable(coordinates.latitude) || !representable(coordinates.longitude) {
            return Err(RegistryError::Encoding);
        }
        Ok(coordinates)
    }

    fn facility(&self, facility_id: &str) -> Result<FacilityRecord> {
        let path = self.locator.facility_file(facility_id);
        decode_file(&path).map_err(|e| {
            debug!(path = %path.display(), "Facility decoding failed: {}", e);
            RegistryError::FacilityParse
        })
    }
}
