//! `TimezoneFinderBuilder`: loads the on-disk artefact set (§6) into a
//! [`TimezoneFinder`] (SPEC_FULL §3 supplement, "two-phase construction"
//! made explicit, mirroring the original `timezonefinder.py`'s
//! open-then-parse split).

use crate::error::{DataError, LoadError};
use crate::hole::HoleRegistry;
use crate::io::flatbuffers::{parse_polygon_collection, parse_shortcuts, ZoneIdWidth};
use crate::io::npy::{I32Column, U16Column, U8Column};
use crate::io::zstd::decompress_if_needed;
use crate::io::{json, Bytes, LoadMode};
use crate::query::TimezoneFinder;
use crate::zone::{ZoneIdVec, ZoneTable};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the env var overriding the data directory (§6 "Environment").
pub const DATA_DIR_ENV: &str = "TZSHARD_DATA_DIR";
/// Name of the env var overriding the load mode (§6 "Environment").
pub const LOAD_MODE_ENV: &str = "TZSHARD_LOAD_MODE";

/// Expected `metadata.json` dataset version (SPEC_FULL §3 supplement). A
/// mismatch is logged, not fatal: the artefact isn't in §6's table, so its
/// absence or disagreement can't be a hard error.
const EXPECTED_DATASET_VERSION: u32 = 1;

/// Builds a [`TimezoneFinder`] from a directory of on-disk artefacts
/// (§6). Mirrors the original's implicit open-then-parse split as two
/// explicit phases: configure, then [`Self::build`].
#[derive(Clone, Debug)]
pub struct TimezoneFinderBuilder {
    data_dir: Option<PathBuf>,
    mode: Option<LoadMode>,
}

impl Default for TimezoneFinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneFinderBuilder {
    /// Starts a builder with no explicit directory or load mode; both
    /// fall back to environment variables, then to hard-coded defaults,
    /// resolved in [`Self::build`].
    #[must_use]
    pub fn new() -> Self {
        Self { data_dir: None, mode: None }
    }

    /// Sets the data directory explicitly, overriding `TZSHARD_DATA_DIR`.
    #[must_use]
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Reads every artefact fully into an owned buffer, overriding
    /// `TZSHARD_LOAD_MODE`.
    #[must_use]
    pub fn in_memory(mut self) -> Self {
        self.mode = Some(LoadMode::InMemory);
        self
    }

    /// Memory-maps every artefact, overriding `TZSHARD_LOAD_MODE`.
    ///
    /// # Safety
    ///
    /// See [`crate::io::Bytes::map`]: the data directory must not be mutated for the
    /// lifetime of the returned [`TimezoneFinder`].
    #[must_use]
    #[allow(unsafe_code, reason = "mmap is fundamentally unsafe; documented and pushed to the public API boundary")]
    pub unsafe fn memory_mapped(mut self) -> Self {
        self.mode = Some(LoadMode::MemoryMapped);
        self
    }

    fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from)).unwrap_or_else(|| PathBuf::from("."))
    }

    fn resolve_mode(&self) -> LoadMode {
        if let Some(mode) = self.mode {
            return mode;
        }
        match env::var(LOAD_MODE_ENV).ok().as_deref() {
            Some("memory") => LoadMode::InMemory,
            _ => LoadMode::MemoryMapped,
        }
    }

    /// Loads and parses every artefact under the configured directory,
    /// producing a ready-to-query [`TimezoneFinder`].
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if an artefact is missing, malformed, or
    /// fails an OS-level read.
    ///
    /// # Safety
    ///
    /// When the resolved load mode is memory-mapped (the default), the
    /// data directory must not be mutated for the lifetime of the
    /// returned [`TimezoneFinder`] (§5).
    #[allow(unsafe_code, reason = "forwards the mmap contract to the loader's internals")]
    pub unsafe fn build(self) -> Result<TimezoneFinder, LoadError> {
        let dir = self.resolve_data_dir();
        let mode = self.resolve_mode();
        log::debug!("loading timezone data from {} ({mode})", dir.display());

        let result = unsafe { self.build_inner(&dir, mode) };
        if let Err(err) = &result {
            log::error!("failed to load timezone data from {}: {err}", dir.display());
        }
        result
    }

    #[allow(unsafe_code, reason = "forwards the mmap contract to per-artefact loaders")]
    unsafe fn build_inner(&self, dir: &Path, mode: LoadMode) -> Result<TimezoneFinder, LoadError> {
        // SAFETY: forwarded from `build`'s caller-supplied contract.
        let names = unsafe { load_json(dir, mode, "timezone_names.json", json::parse_zone_names) }?;
        // SAFETY: forwarded from `build`'s caller-supplied contract.
        let hole_entries = unsafe { load_json(dir, mode, "hole_registry.json", json::parse_hole_registry) }?;
        let hole_registry = HoleRegistry::from_entries(hole_entries);

        let nr_zones = names.len();
        let poly_zone_ids = if nr_zones <= 256 {
            // SAFETY: forwarded from `build`'s caller-supplied contract.
            ZoneIdVec::U8(unsafe { load_npy_u8(dir, mode, "poly_zone_ids.npy") }?)
        } else {
            // SAFETY: forwarded from `build`'s caller-supplied contract.
            ZoneIdVec::U16(unsafe { load_npy_u16(dir, mode, "poly_zone_ids.npy") }?)
        };
        // SAFETY: forwarded from `build`'s caller-supplied contract.
        let zone_positions = unsafe { load_npy_u16(dir, mode, "zone_positions.npy") }?;
        let zones = ZoneTable::from_parts(names, poly_zone_ids, zone_positions);

        // SAFETY: forwarded from `build`'s caller-supplied contract.
        let outer = unsafe { load_polygon_table(dir, mode, "boundaries") }?;
        // SAFETY: forwarded from `build`'s caller-supplied contract.
        let holes = unsafe { load_polygon_table(dir, mode, "holes") }?;

        let width = if nr_zones <= 256 { ZoneIdWidth::U8 } else { ZoneIdWidth::U16 };
        let shortcut_name =
            if width == ZoneIdWidth::U8 { "hybrid_shortcuts_uint8.fbs" } else { "hybrid_shortcuts_uint16.fbs" };
        let shortcut_path = dir.join(shortcut_name);
        let shortcut_bytes = unsafe { read_artefact(&shortcut_path, mode) }?;
        let shortcuts = parse_shortcuts(shortcut_bytes.as_slice(), &shortcut_path, width)?;

        check_metadata(dir, mode);

        Ok(TimezoneFinder::from_parts(outer, holes, zones, hole_registry, shortcuts))
    }
}

#[allow(unsafe_code, reason = "forwards the mmap contract to LoadMode::open")]
unsafe fn read_artefact(path: &Path, mode: LoadMode) -> Result<Bytes, LoadError> {
    // SAFETY: forwarded to the caller of `TimezoneFinderBuilder::build`.
    let bytes = unsafe { mode.open(path) }.map_err(|e| LoadError::io(path, e))?;
    decompress_if_needed(bytes, path).map_err(LoadError::from)
}

#[allow(unsafe_code, reason = "forwards the mmap contract to read_artefact")]
unsafe fn load_json<T>(
    dir: &Path,
    mode: LoadMode,
    name: &str,
    parse: fn(&[u8], &Path) -> Result<T, DataError>,
) -> Result<T, LoadError> {
    let path = dir.join(name);
    let bytes = unsafe { read_artefact(&path, mode) }?;
    parse(bytes.as_slice(), &path).map_err(LoadError::from)
}

#[allow(unsafe_code, reason = "forwards the mmap contract to read_artefact")]
unsafe fn load_npy_u8(dir: &Path, mode: LoadMode, name: &str) -> Result<U8Column, LoadError> {
    let path = dir.join(name);
    let bytes = unsafe { read_artefact(&path, mode) }?;
    U8Column::parse(bytes, &path).map_err(LoadError::from)
}

#[allow(unsafe_code, reason = "forwards the mmap contract to read_artefact")]
unsafe fn load_npy_u16(dir: &Path, mode: LoadMode, name: &str) -> Result<U16Column, LoadError> {
    let path = dir.join(name);
    let bytes = unsafe { read_artefact(&path, mode) }?;
    U16Column::parse(bytes, &path).map_err(LoadError::from)
}

#[allow(unsafe_code, reason = "forwards the mmap contract to read_artefact")]
unsafe fn load_npy_i32(dir: &Path, mode: LoadMode, name: &str) -> Result<I32Column, LoadError> {
    let path = dir.join(name);
    let bytes = unsafe { read_artefact(&path, mode) }?;
    I32Column::parse(bytes, &path).map_err(LoadError::from)
}

#[allow(unsafe_code, reason = "forwards the mmap contract to load_npy/read_artefact")]
unsafe fn load_polygon_table(
    dir: &Path,
    mode: LoadMode,
    subdir: &str,
) -> Result<crate::polygon::PolygonTable, LoadError> {
    // SAFETY: forwarded from `build`'s caller-supplied contract.
    let xmin = unsafe { load_npy_i32(dir, mode, &format!("{subdir}/xmin.npy")) }?;
    // SAFETY: forwarded from `build`'s caller-supplied contract.
    let xmax = unsafe { load_npy_i32(dir, mode, &format!("{subdir}/xmax.npy")) }?;
    // SAFETY: forwarded from `build`'s caller-supplied contract.
    let ymin = unsafe { load_npy_i32(dir, mode, &format!("{subdir}/ymin.npy")) }?;
    // SAFETY: forwarded from `build`'s caller-supplied contract.
    let ymax = unsafe { load_npy_i32(dir, mode, &format!("{subdir}/ymax.npy")) }?;

    let coords_path = dir.join(format!("{subdir}/coordinates.fbs"));
    // SAFETY: forwarded from `build`'s caller-supplied contract.
    let coords_bytes = unsafe { read_artefact(&coords_path, mode) }?;
    parse_polygon_collection(coords_bytes, &coords_path, xmin, xmax, ymin, ymax).map_err(LoadError::from)
}

#[allow(unsafe_code, reason = "forwards the mmap contract to LoadMode::open")]
fn check_metadata(dir: &Path, mode: LoadMode) {
    let path = dir.join("metadata.json");
    // SAFETY: best-effort diagnostic only; a failure to map/read here is
    // swallowed, matching its "absence is not an error" status.
    let Ok(bytes) = (unsafe { mode.open(&path) }) else { return };
    match json::parse_metadata(bytes.as_slice(), &path) {
        Ok(version) if version != EXPECTED_DATASET_VERSION => log::warn!(
            "{}: dataset version {version} does not match expected {EXPECTED_DATASET_VERSION}",
            path.display()
        ),
        Ok(_) => {}
        Err(err) => log::warn!("{err}"),
    }
}
