//! POLIS record types and their JSON decoding.
//!
//! Only the fields the service reads are modelled; everything else in the
//! registry files is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;

/// Top-level metadata record of the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryIndex {
    /// Time of the last registry update
    pub last_update: DateTime<Utc>,
}

/// Identity block shared by POLIS records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
}

/// An entry of the searchable facility catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityReference {
    pub identity: Identity,
}

impl FacilityReference {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            identity: Identity {
                id,
                name: name.into(),
            },
        }
    }

    pub fn id(&self) -> Uuid {
        self.identity.id
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }
}

/// The facility reference listing file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilitiesDirectory {
    #[serde(default)]
    pub observing_facility_references: Vec<FacilityReference>,
}

/// A single observing facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub identity: Identity,
    #[serde(default, rename = "facility_location_id")]
    pub location_id: Option<Uuid>,
}

/// A measured value with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
}

/// Geographic position of a facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(default)]
    pub latitude: Option<Measurement>,
    #[serde(default, rename = "east_longitude")]
    pub longitude: Option<Measurement>,
}

impl LocationRecord {
    pub fn latitude(&self) -> Option<f64> {
        self.latitude.map(|m| m.value)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude.map(|m| m.value)
    }
}

/// Read and decode a JSON record from `path`
pub fn decode_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!(path = %path.display(), "Decoding registry file");
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
