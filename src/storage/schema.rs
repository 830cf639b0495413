//! Versioned collection blobs
//!
//! Current format: `{"version": 2, "items": [...]}`. A bare JSON array is a
//! version 1 blob written before versioning existed; its items are upgraded
//! record by record through [`Record::from_legacy`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{FolioError, FolioResult};
use crate::models::{FinanceEntry, Project};

use super::migrate::upgrade_legacy_project;

/// Version written by this build
pub const SCHEMA_VERSION: u32 = 2;

/// Version implied by an unversioned (bare array) blob
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// A record type that can be stored in a collection
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Human-readable name used in log messages
    const KIND: &'static str;

    /// Upgrade a record written by an older schema version
    fn from_legacy(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl Record for FinanceEntry {
    const KIND: &'static str = "finance entry";
}

impl Record for Project {
    const KIND: &'static str = "project";

    fn from_legacy(value: Value) -> Result<Self, serde_json::Error> {
        upgrade_legacy_project(value)
    }
}

#[derive(Serialize)]
struct BlobRef<'a, T> {
    version: u32,
    items: &'a [T],
}

/// Serialize a collection into the current blob format
pub fn encode_collection<T: Record>(items: &[T]) -> FolioResult<String> {
    let blob = BlobRef {
        version: SCHEMA_VERSION,
        items,
    };
    serde_json::to_string(&blob).map_err(|e| {
        FolioError::Json(format!("Failed to serialize {} collection: {}", T::KIND, e))
    })
}

/// Parse a blob of any known version into records
pub fn decode_collection<T: Record>(text: &str) -> FolioResult<Vec<T>> {
    let value: Value = serde_json::from_str(text)?;

    match value {
        Value::Array(items) => decode_items(items, LEGACY_SCHEMA_VERSION),
        Value::Object(mut map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| FolioError::Json("Collection blob has no version".into()))?;
            let version = u32::try_from(version)
                .map_err(|_| FolioError::Json(format!("Invalid blob version {}", version)))?;
            if version > SCHEMA_VERSION {
                return Err(FolioError::Json(format!(
                    "Collection was written by a newer version (schema {}, supported {})",
                    version, SCHEMA_VERSION
                )));
            }
            match map.remove("items") {
                Some(Value::Array(items)) => decode_items(items, version),
                _ => Err(FolioError::Json("Collection blob has no items array".into())),
            }
        }
        _ => Err(FolioError::Json(
            "Collection blob must be an array or a versioned object".into(),
        )),
    }
}

/// Decode a list of raw records written by `version`
pub fn decode_items<T: Record>(items: Vec<Value>, version: u32) -> FolioResult<Vec<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let decoded = if version < SCHEMA_VERSION {
                T::from_legacy(item)
            } else {
                serde_json::from_value(item)
            };
            decoded.map_err(|e| {
                FolioError::Json(format!("Invalid {} at position {}: {}", T::KIND, index, e))
            })
        })
        .collect()
}
