//! Transparent Zstandard decompression for coordinate files (§6).

use crate::error::DataError;
use crate::io::Bytes;
use std::path::Path;

/// Zstandard frame magic number.
const MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// True if `bytes` starts with the Zstandard magic number.
#[must_use]
pub fn is_compressed(bytes: &[u8]) -> bool {
    bytes.starts_with(&MAGIC)
}

/// Returns `bytes` decompressed if it carries the Zstandard magic, or
/// `bytes` unchanged otherwise: an uncompressed artefact is handed back
/// as-is rather than copied, so a memory-mapped file stays memory-mapped
/// (§5, §9 "In-memory vs. memory-mapped").
///
/// # Errors
///
/// Returns [`DataError`] if `bytes` carries the magic but is not a valid
/// Zstandard frame.
pub fn decompress_if_needed(bytes: Bytes, path: &Path) -> Result<Bytes, DataError> {
    if is_compressed(bytes.as_slice()) {
        let decoded = zstd::stream::decode_all(bytes.as_slice())
            .map_err(|e| DataError::new(path, e.to_string()))?;
        Ok(Bytes::owned(decoded))
    } else {
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_magic() {
        assert!(is_compressed(&[0x28, 0xB5, 0x2F, 0xFD, 0, 0]));
        assert!(!is_compressed(&[0, 0, 0, 0]));
        assert!(!is_compressed(&[]));
    }

    #[test]
    fn passes_through_uncompressed() {
        let data = b"plain bytes".to_vec();
        let decoded = decompress_if_needed(Bytes::owned(data.clone()), Path::new("x"))
            .expect("plain bytes pass through");
        assert_eq!(decoded.as_slice(), data);
    }

    #[test]
    fn round_trips_compressed() {
        let original = b"hello hello hello hello hello".repeat(10);
        let compressed = zstd::stream::encode_all(&original[..], 3).expect("in-memory encode cannot fail");
        assert!(is_compressed(&compressed));
        let decoded = decompress_if_needed(Bytes::owned(compressed), Path::new("x")).expect("well-formed zstd frame");
        assert_eq!(decoded.as_slice(), original);
    }
}
