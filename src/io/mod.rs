//! On-disk artefact loading (§6) behind a single byte-slice provider
//! abstraction, so the parsers in [`npy`], [`json`], [`zstd`] and
//! [`flatbuffers`] never need to know whether a file was memory-mapped or
//! read fully into an owned buffer (§5, §9 "In-memory vs. memory-mapped").

pub mod flatbuffers;
pub mod json;
pub mod loader;
pub mod npy;
pub mod zstd;

use either::Either;
use memmap2::Mmap;
use std::{fmt, fs::File, io, path::Path};

/// Either a memory-mapped file or an owned in-memory buffer. Every parser
/// in this module consumes `&[u8]` via [`Bytes::as_slice`], so the two
/// backends are otherwise indistinguishable to calling code.
#[derive(Debug)]
pub struct Bytes(Either<Mmap, Vec<u8>>);

impl Bytes {
    /// Memory-maps `path` (§5's default loading mode).
    ///
    /// # Safety
    ///
    /// Memory-mapping is inherently unsafe: if the backing file is
    /// truncated or modified by another process while mapped, accesses
    /// past the new end of file are undefined behavior. Callers must only
    /// point this at files they control for the lifetime of the returned
    /// [`TimezoneFinder`](crate::TimezoneFinder).
    #[allow(unsafe_code, reason = "mmap is fundamentally unsafe; documented and pushed to the public API boundary")]
    pub unsafe fn map(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        // SAFETY: forwarded to the caller of `Bytes::map`.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self(Either::Left(mmap)))
    }

    /// Reads `path` fully into an owned buffer (§5's "In-memory" mode).
    pub fn read(path: &Path) -> io::Result<Self> {
        std::fs::read(path).map(|buf| Self(Either::Right(buf)))
    }

    /// Wraps an already-owned buffer, e.g. one produced by decompressing a
    /// Zstandard frame rather than read directly off disk.
    pub(crate) fn owned(buf: Vec<u8>) -> Self {
        Self(Either::Right(buf))
    }

    /// Borrows the underlying bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        match &self.0 {
            Either::Left(mmap) => mmap,
            Either::Right(buf) => buf,
        }
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// How the loader should back its buffers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum LoadMode {
    /// Memory-map each artefact (default).
    #[default]
    MemoryMapped,
    /// Read each artefact fully into an owned buffer.
    InMemory,
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MemoryMapped => "memory-mapped",
            Self::InMemory => "in-memory",
        })
    }
}

impl LoadMode {
    /// Opens `path` per this mode.
    ///
    /// # Safety
    ///
    /// See [`Bytes::map`]: in `MemoryMapped` mode the caller must ensure
    /// `path` is not mutated out from under the mapping.
    #[allow(unsafe_code, reason = "forwards to Bytes::map, same contract")]
    pub unsafe fn open(self, path: &Path) -> io::Result<Bytes> {
        match self {
            // SAFETY: forwarded to the caller of `LoadMode::open`.
            Self::MemoryMapped => unsafe { Bytes::map(path) },
            Self::InMemory => Bytes::read(path),
        }
    }
}
