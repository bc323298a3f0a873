//! Test data generation utilities.
//!
//! Writes small POLIS mirrors into temporary folders, laid out the way the
//! bulk fetch leaves them on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: &str = "0.2.0-alpha.1";

pub const KECK_ID: &str = "2f6c1d0a-7b3e-4c9a-8e21-5d4f3a2b1c01";
pub const KECK_LOCATION_ID: &str = "2f6c1d0a-7b3e-4c9a-8e21-5d4f3a2b1c11";
pub const VLA_ID: &str = "2f6c1d0a-7b3e-4c9a-8e21-5d4f3a2b1c02";

pub const KECK_LATITUDE: f64 = 19.8263;
pub const KECK_LONGITUDE: f64 = -155.4747;

/// Incrementally writes a mirror below `root`
pub struct MirrorBuilder {
    root: PathBuf,
}

impl MirrorBuilder {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn version_dir(&self) -> PathBuf {
        self.root.join("polis").join(SCHEMA_VERSION)
    }

    fn facility_dir(&self, facility_id: &str) -> PathBuf {
        self.version_dir()
            .join("polis_observing_facilities")
            .join(facility_id)
    }

    fn write(path: PathBuf, body: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, body)
    }

    pub fn directory(&self, last_update: &str) -> io::Result<&Self> {
        Self::write(
            self.version_dir().join("polis_directory.json"),
            &format!(r#"{{"last_update": "{}", "name": "POLIS test directory"}}"#, last_update),
        )?;
        Ok(self)
    }

    pub fn references(&self, references: &[(&str, &str)]) -> io::Result<&Self> {
        let entries: Vec<serde_json::Value> = references
            .iter()
            .map(|(id, name)| serde_json::json!({ "identity": { "id": id, "name": name } }))
            .collect();
        let body = serde_json::json!({
            "last_update": "2024-03-01T12:00:00Z",
            "observing_facility_references": entries,
        });
        Self::write(
            self.version_dir()
                .join("polis_observing_facilities_directory.json"),
            &body.to_string(),
        )?;
        Ok(self)
    }

    pub fn facility(&self, facility_id: &str, location_id: Option<&str>) -> io::Result<&Self> {
        let body = serde_json::json!({
            "identity": { "id": facility_id },
            "facility_location_id": location_id,
        });
        Self::write(
            self.facility_dir(facility_id)
                .join(format!("{}.json", facility_id)),
            &body.to_string(),
        )?;
        Ok(self)
    }

    pub fn location(
        &self,
        facility_id: &str,
        location_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> io::Result<&Self> {
        let body = serde_json::json!({
            "latitude": { "value": latitude, "unit": "deg" },
            "east_longitude": { "value": longitude, "unit": "deg" },
        });
        Self::write(
            self.facility_dir(facility_id)
                .join(format!("{}.json", location_id)),
            &body.to_string(),
        )?;
        Ok(self)
    }

    pub fn raw(&self, relative: &str, body: &str) -> io::Result<&Self> {
        Self::write(self.version_dir().join(relative), body)?;
        Ok(self)
    }
}

/// The two-facility mirror used across the API tests:
/// Keck has a location, the VLA record has none.
pub fn create_keck_vla_mirror(root: &Path) -> io::Result<()> {
    MirrorBuilder::new(root)
        .directory("2024-03-01T12:34:56Z")?
        .references(&[(KECK_ID, "Keck Observatory"), (VLA_ID, "VLA")])?
        .facility(KECK_ID, Some(KECK_LOCATION_ID))?
        .location(KECK_ID, KECK_LOCATION_ID, KECK_LATITUDE, KECK_LONGITUDE)?
        .facility(VLA_ID, None)?;
    Ok(())
}
