//! Resource locator for the local POLIS mirror.
//!
//! Translates logical record identifiers into file paths below the mirror
//! root. The layout is keyed by the declared schema version:
//!
//! ```text
//! <root>/polis/<version>/polis_directory.json
//! <root>/polis/<version>/polis_observing_facilities_directory.json
//! <root>/polis/<version>/polis_observing_facilities/<facility>/<facility>.json
//! <root>/polis/<version>/polis_observing_facilities/<facility>/<location>.json
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{RegistryError, Result};

/// Name of the top-level folder the bulk fetch creates inside the mirror root
pub const POLIS_FOLDER: &str = "polis";

const DIRECTORY_FILE: &str = "polis_directory.json";
const FACILITIES_DIRECTORY_FILE: &str = "polis_observing_facilities_directory.json";
const FACILITIES_FOLDER: &str = "polis_observing_facilities";

/// Semantic version of the POLIS data layout (`MAJOR.MINOR.PATCH[-PRERELEASE]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<String>,
}

impl FromStr for SchemaVersion {
    type Err = RegistryError;

    fn from_str(token: &str) -> Result<Self> {
        let (core, pre_release) = match token.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (token, None),
        };

        let numbers = core
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(RegistryError::VersionInit);
                }
                part.parse::<u64>().map_err(|_| RegistryError::VersionInit)
            })
            .collect::<Result<Vec<_>>>()?;

        let [major, minor, patch] = numbers[..] else {
            return Err(RegistryError::VersionInit);
        };

        if let Some(pre) = pre_release {
            let valid = !pre.is_empty()
                && pre.split('.').all(|ident| {
                    !ident.is_empty()
                        && ident
                            .bytes()
                            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
                });
            if !valid {
                return Err(RegistryError::VersionInit);
            }
        }

        Ok(Self {
            major,
            minor,
            patch,
            pre_release: pre_release.map(str::to_string),
        })
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// Maps record identifiers to files under the mirror root
#[derive(Debug, Clone)]
pub struct ResourceLocator {
    base: PathBuf,
    version: SchemaVersion,
}

impl ResourceLocator {
    /// Create a locator over `root`, which must be an existing directory
    pub fn new(root: &Path, version: SchemaVersion) -> Result<Self> {
        if !root.is_dir() {
            return Err(RegistryError::ResourceLocator);
        }
        let base = root.join(POLIS_FOLDER).join(version.to_string());
        Ok(Self { base, version })
    }

    /// The schema version this locator resolves against
    pub fn version(&self) -> &SchemaVersion {
        &self.version
    }

    /// Path of the top-level directory record
    pub fn directory_file(&self) -> PathBuf {
        self.base.join(DIRECTORY_FILE)
    }

    /// Path of the facility reference listing
    pub fn facilities_directory_file(&self) -> PathBuf {
        self.base.join(FACILITIES_DIRECTORY_FILE)
    }

    /// Path of a single facility record
    pub fn facility_file(&self, facility_id: &str) -> PathBuf {
        let component = path_component(facility_id);
        self.base
            .join(FACILITIES_FOLDER)
            .join(&component)
            .join(format!("{}.json", component))
    }

    /// Path of a data record (such as a location) owned by a facility
    pub fn facility_data_file(&self, facility_id: &str, record_id: Uuid) -> PathBuf {
        self.base
            .join(FACILITIES_FOLDER)
            .join(path_component(facility_id))
            .join(format!("{}.json", record_id))
    }
}

/// Ids come straight from the query string; keep each one to a single path component.
fn path_component(id: &str) -> String {
    Path::new(id)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema_version() {
        let version: SchemaVersion = "0.2.0-alpha.1".parse().unwrap();
        assert_eq!(version.major, 0);
        assert_eq!(version.minor, 2);
        assert_eq!(version.patch, 0);
        assert_eq!(version.pre_release.as_deref(), Some("alpha.1"));
        assert_eq!(version.to_string(), "0.2.0-alpha.1");

        let plain: SchemaVersion = "1.10.3".parse().unwrap();
        assert_eq!(plain.pre_release, None);
        assert_eq!(plain.to_string(), "1.10.3");
    }

    #[test]
    fn test_reject_invalid_schema_version() {
        for token in ["", "1.2", "1.2.3.4", "a.b.c", "1.2.3-", "1..3", "1.2.3-al pha"] {
            assert!(
                matches!(
                    token.parse::<SchemaVersion>(),
                    Err(RegistryError::VersionInit)
                ),
                "{token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_locator_requires_directory() {
        let version: SchemaVersion = "0.2.0-alpha.1".parse().unwrap();
        let missing = Path::new("/definitely/not/a/mirror");
        assert!(matches!(
            ResourceLocator::new(missing, version),
            Err(RegistryError::ResourceLocator)
        ));
    }

    #[test]
    fn test_locator_paths() {
        let dir = tempfile::tempdir().unwrap();
        let version: SchemaVersion = "0.2.0-alpha.1".parse().unwrap();
        let locator = ResourceLocator::new(dir.path(), version).unwrap();
        let base = dir.path().join("polis").join("0.2.0-alpha.1");

        assert_eq!(locator.directory_file(), base.join("polis_directory.json"));
        assert_eq!(
            locator.facilities_directory_file(),
            base.join("polis_observing_facilities_directory.json")
        );

        let facility = "4b9a2f1e-0000-4000-8000-000000000001";
        let location = Uuid::parse_str("4b9a2f1e-0000-4000-8000-000000000002").unwrap();
        let folder = base.join("polis_observing_facilities").join(facility);
        assert_eq!(
            locator.facility_file(facility),
            folder.join(format!("{facility}.json"))
        );
        assert_eq!(
            locator.facility_data_file(facility, location),
            folder.join(format!("{location}.json"))
        );
    }

    #[test]
    fn test_facility_id_cannot_escape_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let version: SchemaVersion = "1.0.0".parse().unwrap();
        let locator = ResourceLocator::new(dir.path(), version).unwrap();

        let path = locator.facility_file("../../etc");
        assert!(path.starts_with(dir.path().join("polis")));
    }
}
