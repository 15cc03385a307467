//! JSON and binary encodings of spectrum sets.

use serde::{Deserialize, Serialize};
use tofred_core::{ErrorInfo, ReductionError, SchemaVersion};

use crate::hash::canonical_hash;
use crate::model::SpectrumSet;

const SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

#[derive(Debug, Serialize, Deserialize)]
struct SetPayload {
    schema_version: SchemaVersion,
    content_hash: String,
    set: SpectrumSet,
}

/// Serializes a set to pretty JSON, tagged with schema version and content hash.
pub fn to_json(set: &SpectrumSet) -> Result<String, ReductionError> {
    let payload = SetPayload {
        schema_version: SCHEMA,
        content_hash: canonical_hash(set),
        set: set.clone(),
    };
    serde_json::to_string_pretty(&payload)
        .map_err(|err| ReductionError::Serde(ErrorInfo::new("json-serialize", err.to_string())))
}

/// Restores a set from JSON, checking schema, content hash and set invariants.
pub fn from_json(data: &str) -> Result<SpectrumSet, ReductionError> {
    let payload: SetPayload = serde_json::from_str(data)
        .map_err(|err| ReductionError::Serde(ErrorInfo::new("json-deserialize", err.to_string())))?;
    if payload.schema_version.major != SCHEMA.major {
        return Err(ReductionError::Serde(
            ErrorInfo::new("schema-version", "unsupported schema major version")
                .with_context("found", payload.schema_version)
                .with_context("expected", SCHEMA),
        ));
    }
    let actual = canonical_hash(&payload.set);
    if actual != payload.content_hash {
        return Err(ReductionError::Serde(
            ErrorInfo::new("hash-mismatch", "content hash does not match the decoded set")
                .with_context("recorded", &payload.content_hash)
                .with_context("actual", actual),
        ));
    }
    payload.set.validate()?;
    Ok(payload.set)
}

/// Serializes a set into a binary blob.
pub fn to_bytes(set: &SpectrumSet) -> Result<Vec<u8>, ReductionError> {
    let json = to_json(set)?;
    bincode::serialize(&json)
        .map_err(|err| ReductionError::Serde(ErrorInfo::new("bincode-serialize", err.to_string())))
}

/// Rehydrates a set from a binary blob.
pub fn from_bytes(bytes: &[u8]) -> Result<SpectrumSet, ReductionError> {
    let json: String = bincode::deserialize(bytes).map_err(|err| {
        ReductionError::Serde(ErrorInfo::new("bincode-deserialize", err.to_string()))
    })?;
    from_json(&json)
}
