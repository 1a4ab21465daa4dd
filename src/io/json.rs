//! JSON artefact parsing: `timezone_names.json` and `hole_registry.json`
//! (§6), plus the best-effort `metadata.json` supplement (SPEC_FULL §3).

use crate::error::DataError;
use crate::hole::HoleRange;
use ahash::AHashMap;
use serde::Deserialize;
use std::path::Path;

/// Parses `timezone_names.json`: a JSON array of strings, index = zone id.
///
/// # Errors
///
/// Returns [`DataError`] if `bytes` is not a valid JSON array of strings.
pub fn parse_zone_names(bytes: &[u8], path: &Path) -> Result<Vec<String>, DataError> {
    serde_json::from_slice(bytes).map_err(|e| DataError::new(path, e.to_string()))
}

/// Parses `hole_registry.json`: a JSON object whose keys are polygon-id
/// strings and whose values are `[hole_count, first_hole_id]`.
///
/// # Errors
///
/// Returns [`DataError`] if `bytes` is malformed JSON or a key is not a
/// valid `u16`.
pub fn parse_hole_registry(
    bytes: &[u8],
    path: &Path,
) -> Result<AHashMap<u16, HoleRange>, DataError> {
    let raw: AHashMap<String, [u16; 2]> =
        serde_json::from_slice(bytes).map_err(|e| DataError::new(path, e.to_string()))?;

    raw.into_iter()
        .map(|(key, [count, first_id])| {
            let poly_id: u16 = key
                .parse()
                .map_err(|_| DataError::new(path, format!("non-integer polygon id key {key:?}")))?;
            Ok((poly_id, HoleRange { count, first_id }))
        })
        .collect()
}

#[derive(Deserialize)]
struct Metadata {
    version: u32,
}

/// Parses the optional `metadata.json` supplement. Its absence is not an
/// error (the artefact isn't in §6's table); only a malformed *present*
/// file is.
///
/// # Errors
///
/// Returns [`DataError`] if `bytes` is present but not a valid metadata
/// object.
pub fn parse_metadata(bytes: &[u8], path: &Path) -> Result<u32, DataError> {
    let metadata: Metadata =
        serde_json::from_slice(bytes).map_err(|e| DataError::new(path, e.to_string()))?;
    Ok(metadata.version)
}
