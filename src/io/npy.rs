//! Minimal reader for the NumPy `.npy` format used by `poly_zone_ids.npy`,
//! `zone_positions.npy`, and the `boundaries/`/`holes/` bbox vectors (§6).
//!
//! Every array stays behind the [`Bytes`] it was loaded from (memory-mapped
//! or owned, per the configured load mode) and is decoded element-by-element
//! on access instead of being copied into a fresh `Vec` up front, so a
//! memory-mapped artefact (§5, §9 "In-memory vs. memory-mapped") is never
//! defeated by an eager copy.
//!
//! Only what the build tool actually emits is supported: a v1.0 or v2.0
//! header describing a 1-D little-endian array of `u8`, `u16`, or `i32`,
//! followed by the raw array. No crate in the retrieval pack reads `.npy`
//! files, and the format is small and fully specified, so this is
//! hand-rolled rather than pulled in as a dependency.

use crate::error::DataError;
use crate::io::Bytes;
use std::path::Path;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Supported element types.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Dtype {
    /// NumPy `|u1`/`<u1`.
    U8,
    /// NumPy `<u2`.
    U16,
    /// NumPy `<i4`.
    I32,
}

impl Dtype {
    fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::I32 => 4,
        }
    }

    fn from_descr(descr: &str) -> Option<Self> {
        match descr {
            "|u1" | "<u1" => Some(Self::U8),
            "<u2" => Some(Self::U16),
            "<i4" => Some(Self::I32),
            _ => None,
        }
    }
}

/// A parsed `.npy` header: element type, element count, and the byte
/// offset the payload starts at. Carries no borrow, so it can be computed
/// once and then used to index into whichever [`Bytes`] the caller keeps
/// alive.
#[derive(Clone, Copy, Debug)]
struct NpyHeader {
    dtype: Dtype,
    len: usize,
    payload_start: usize,
}

impl NpyHeader {
    /// Parses the `.npy` header and validates the payload length matches
    /// the declared shape.
    fn parse(bytes: &[u8], path: &Path) -> Result<Self, DataError> {
        let err = |reason: &str| DataError::new(path, reason.to_owned());

        if bytes.len() < 10 || &bytes[0..6] != MAGIC {
            return Err(err("missing NPY magic"));
        }
        let major = bytes[6];
        let (header_len_size, header_start) = if major >= 2 { (4, 10) } else { (2, 8) };
        if bytes.len() < header_start + header_len_size {
            return Err(err("truncated NPY header"));
        }
        let header_len = if header_len_size == 2 {
            u16::from_le_bytes([bytes[8], bytes[9]]) as usize
        } else {
            u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize
        };
        let header_end = header_start + header_len;
        if bytes.len() < header_end {
            return Err(err("truncated NPY header"));
        }
        let header = std::str::from_utf8(&bytes[header_start..header_end])
            .map_err(|_| err("NPY header is not valid UTF-8"))?;

        let descr = extract_quoted(header, "'descr':").ok_or_else(|| err("missing 'descr' field"))?;
        let dtype = Dtype::from_descr(&descr).ok_or_else(|| err("unsupported dtype"))?;

        let fortran_order = extract_bare(header, "'fortran_order':")
            .ok_or_else(|| err("missing 'fortran_order' field"))?;
        if fortran_order.trim() != "False" {
            return Err(err("fortran-ordered arrays are not supported"));
        }

        let shape = extract_shape(header).ok_or_else(|| err("missing or malformed 'shape' field"))?;
        if shape.len() != 1 {
            return Err(err("only 1-D arrays are supported"));
        }
        let len = shape[0];

        let expected = len * dtype.size();
        if bytes.len() - header_end < expected {
            return Err(err("payload shorter than declared shape"));
        }

        Ok(Self { dtype, len, payload_start: header_end })
    }
}

/// A `.npy` array kept behind its original [`Bytes`], decoding elements on
/// demand so a memory-mapped artefact is never copied out wholesale.
#[derive(Debug)]
pub struct MappedArray {
    bytes: Bytes,
    header: NpyHeader,
}

impl MappedArray {
    fn parse(bytes: Bytes, path: &Path, expected: Dtype, mismatch: &str) -> Result<Self, DataError> {
        let header = NpyHeader::parse(bytes.as_slice(), path)?;
        if header.dtype != expected {
            return Err(DataError::new(path, mismatch.to_owned()));
        }
        Ok(Self { bytes, header })
    }

    fn len(&self) -> usize {
        self.header.len
    }

    fn u8_at(&self, i: usize) -> u8 {
        self.bytes.as_slice()[self.header.payload_start + i]
    }

    fn u16_at(&self, i: usize) -> u16 {
        let start = self.header.payload_start + i * 2;
        let b = self.bytes.as_slice();
        u16::from_le_bytes([b[start], b[start + 1]])
    }

    fn i32_at(&self, i: usize) -> i32 {
        let start = self.header.payload_start + i * 4;
        let b = self.bytes.as_slice();
        i32::from_le_bytes([b[start], b[start + 1], b[start + 2], b[start + 3]])
    }
}

/// A column of `u8` values: either built directly in memory (tests, or a
/// caller assembling its own dataset) or backed by a loaded `.npy`
/// artefact such as `poly_zone_ids.npy` (§6).
#[derive(Debug)]
pub enum U8Column {
    /// Values already held in memory.
    Owned(Vec<u8>),
    /// A `.npy` payload kept behind its original [`Bytes`].
    Mapped(MappedArray),
}

impl U8Column {
    pub(crate) fn parse(bytes: Bytes, path: &Path) -> Result<Self, DataError> {
        MappedArray::parse(bytes, path, Dtype::U8, "expected dtype u1").map(Self::Mapped)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Owned(v) => v.len(),
            Self::Mapped(m) => m.len(),
        }
    }

    /// True if the column has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`-th element.
    #[must_use]
    pub fn get(&self, i: usize) -> u8 {
        match self {
            Self::Owned(v) => v[i],
            Self::Mapped(m) => m.u8_at(i),
        }
    }
}

impl Default for U8Column {
    fn default() -> Self {
        Self::Owned(Vec::new())
    }
}

/// A column of `u16` values: either built directly in memory or backed by
/// a loaded `.npy` artefact such as `zone_positions.npy` (§6).
#[derive(Debug)]
pub enum U16Column {
    /// Values already held in memory.
    Owned(Vec<u16>),
    /// A `.npy` payload kept behind its original [`Bytes`].
    Mapped(MappedArray),
}

impl U16Column {
    pub(crate) fn parse(bytes: Bytes, path: &Path) -> Result<Self, DataError> {
        MappedArray::parse(bytes, path, Dtype::U16, "expected dtype <u2").map(Self::Mapped)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Owned(v) => v.len(),
            Self::Mapped(m) => m.len(),
        }
    }

    /// True if the column has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`-th element.
    #[must_use]
    pub fn get(&self, i: usize) -> u16 {
        match self {
            Self::Owned(v) => v[i],
            Self::Mapped(m) => m.u16_at(i),
        }
    }
}

impl Default for U16Column {
    fn default() -> Self {
        Self::Owned(Vec::new())
    }
}

/// A column of `i32` values: either built directly in memory or backed by
/// a loaded `.npy` artefact such as a `boundaries/xmin.npy` bbox vector
/// (§6).
#[derive(Debug)]
pub enum I32Column {
    /// Values already held in memory.
    Owned(Vec<i32>),
    /// A `.npy` payload kept behind its original [`Bytes`].
    Mapped(MappedArray),
}

impl I32Column {
    pub(crate) fn parse(bytes: Bytes, path: &Path) -> Result<Self, DataError> {
        MappedArray::parse(bytes, path, Dtype::I32, "expected dtype <i4").map(Self::Mapped)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Owned(v) => v.len(),
            Self::Mapped(m) => m.len(),
        }
    }

    /// True if the column has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`-th element.
    #[must_use]
    pub fn get(&self, i: usize) -> i32 {
        match self {
            Self::Owned(v) => v[i],
            Self::Mapped(m) => m.i32_at(i),
        }
    }
}

impl Default for I32Column {
    fn default() -> Self {
        Self::Owned(Vec::new())
    }
}

/// Extracts a single-quoted value following `key` in a Python-dict-literal
/// header, e.g. `extract_quoted("{'descr': '<i4', ...}", "'descr':")` ->
/// `Some("<i4")`.
fn extract_quoted(header: &str, key: &str) -> Option<String> {
    let after = header.split_once(key)?.1.trim_start();
    let after = after.strip_prefix('\'')?;
    let end = after.find('\'')?;
    Some(after[..end].to_owned())
}

/// Extracts the bare (unquoted) token following `key`, up to the next
/// comma or closing brace.
fn extract_bare(header: &str, key: &str) -> Option<String> {
    let after = header.split_once(key)?.1.trim_start();
    let end = after.find([',', '}']).unwrap_or_else(|| after.len());
    Some(after[..end].trim().to_owned())
}

/// Extracts the `'shape': (n, m, ...)` tuple as a list of `usize`.
fn extract_shape(header: &str) -> Option<Vec<usize>> {
    let after = header.split_once("'shape':")?.1.trim_start();
    let after = after.strip_prefix('(')?;
    let end = after.find(')')?;
    after[..end]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_npy(descr: &str, shape: usize, payload: &[u8]) -> Vec<u8> {
        let header_body =
            format!("{{'descr': '{descr}', 'fortran_order': False, 'shape': ({shape},), }}");
        // Pad so magic(6) + version(2) + header_len(2) + header is a
        // multiple of 64, NumPy-style, then trailing newline.
        let mut header_body = header_body.into_bytes();
        header_body.push(b'\n');
        let total_prefix = 10 + header_body.len();
        let pad = (64 - total_prefix % 64) % 64;
        // Replace the final newline with padding + newline to keep a valid
        // trailing byte, matching how NumPy pads with spaces.
        header_body.pop();
        for _ in 0..pad {
            header_body.push(b' ');
        }
        header_body.push(b'\n');

        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&[1, 0]); // version 1.0
        bytes.extend_from_slice(&(header_body.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&header_body);
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn parses_u16_array() {
        let payload: Vec<u8> = [1u16, 2, 65535].iter().flat_map(|v| v.to_le_bytes()).collect();
        let bytes = build_npy("<u2", 3, &payload);
        let column = U16Column::parse(Bytes::owned(bytes), Path::new("x.npy")).expect("well-formed npy header");
        assert_eq!(column.len(), 3);
        assert_eq!((0..column.len()).map(|i| column.get(i)).collect::<Vec<_>>(), vec![1, 2, 65535]);
    }

    #[test]
    fn parses_i32_array_with_negatives() {
        let payload: Vec<u8> = [-1i32, 100, i32::MIN].iter().flat_map(|v| v.to_le_bytes()).collect();
        let bytes = build_npy("<i4", 3, &payload);
        let column = I32Column::parse(Bytes::owned(bytes), Path::new("x.npy")).expect("well-formed npy header");
        assert_eq!((0..column.len()).map(|i| column.get(i)).collect::<Vec<_>>(), vec![-1, 100, i32::MIN]);
    }

    #[test]
    fn parses_u8_array() {
        let bytes = build_npy("|u1", 2, &[7, 8]);
        let column = U8Column::parse(Bytes::owned(bytes), Path::new("x.npy")).expect("well-formed npy header");
        assert_eq!((0..column.len()).map(|i| column.get(i)).collect::<Vec<_>>(), vec![7, 8]);
    }

    #[test]
    fn rejects_bad_magic() {
        let err = U8Column::parse(Bytes::owned(b"not an npy file at all".to_vec()), Path::new("x.npy")).unwrap_err();
        assert!(err.reason.contains("magic"));
    }

    #[test]
    fn rejects_dtype_mismatch() {
        let bytes = build_npy("<u2", 1, &[0, 0]);
        assert!(I32Column::parse(Bytes::owned(bytes), Path::new("x.npy")).is_err());
    }

    #[test]
    fn rejects_truncated_v2_header_length_field() {
        // A v2.0 header (major = 2) declares a 4-byte header-length field
        // at offset 8..12, but this buffer ends at offset 11: reading it
        // must surface a `DataError`, never panic on an out-of-bounds
        // index.
        let bytes = vec![0x93, b'N', b'U', b'M', b'P', b'Y', 2, 0, 0, 0, 0];
        let err = U8Column::parse(Bytes::owned(bytes), Path::new("x.npy")).unwrap_err();
        assert!(err.reason.contains("truncated"));
    }
}
