//! Zone table: polygon id -> zone id, and zone id -> zone name (§3, §4.3).

use crate::io::npy::{U16Column, U8Column};
use std::fmt;
use std::ops::Range;

/// Index into the zone-name list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ZoneId(u16);

impl ZoneId {
    /// Wraps a raw zone-name-list index.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw index into the zone-name list.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index into the outer-polygon store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PolyId(u16);

impl PolyId {
    /// Wraps a raw outer-polygon-store index.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw index into the outer-polygon store.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

/// Storage width for `poly_zone_ids`, chosen at build time: 1 byte if
/// `nr_zones <= 256`, else 2 bytes (§3). Each column is either built
/// directly in memory or kept behind the [`crate::io::Bytes`] it was
/// loaded from, decoded on demand (§5, §9 "In-memory vs. memory-mapped").
#[derive(Debug)]
pub enum ZoneIdVec {
    /// One byte per polygon; valid only when there are at most 256 zones.
    U8(U8Column),
    /// Two bytes per polygon.
    U16(U16Column),
}

impl ZoneIdVec {
    fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
        }
    }

    fn get(&self, i: usize) -> u16 {
        match self {
            Self::U8(v) => u16::from(v.get(i)),
            Self::U16(v) => v.get(i),
        }
    }
}

/// Prefix shared by every ocean zone name (§3: "Ocean zones are
/// distinguished by name prefix `Etc/GMT`").
pub const OCEAN_ZONE_PREFIX: &str = "Etc/GMT";

/// Returns true if `zone_name` names an ocean zone.
#[must_use]
pub fn is_ocean_zone(zone_name: &str) -> bool {
    zone_name.starts_with(OCEAN_ZONE_PREFIX)
}

/// Zone id <-> zone name <-> polygon range mapping, with the sortedness
/// invariant from §3 enforced at construction: `poly_zone_ids` is
/// non-decreasing and `zone_positions` is its run-length boundary index.
#[derive(Debug, Default)]
pub struct ZoneTable {
    names: Vec<String>,
    poly_zone_ids: ZoneIdVec,
    /// Length `nr_zones + 1`; zone `z`'s polygons are
    /// `[zone_positions[z], zone_positions[z+1])`.
    zone_positions: U16Column,
}

impl Default for ZoneIdVec {
    fn default() -> Self {
        Self::U8(U8Column::default())
    }
}

impl ZoneTable {
    /// Builds a zone table from already-validated parts. Exposed alongside
    /// [`crate::TimezoneFinder::from_parts`] for callers assembling their
    /// own in-memory dataset instead of going through the on-disk loader.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `poly_zone_ids` is not non-decreasing or
    /// `zone_positions.len() != names.len() + 1`.
    #[must_use]
    pub fn from_parts(
        names: Vec<String>,
        poly_zone_ids: ZoneIdVec,
        zone_positions: U16Column,
    ) -> Self {
        debug_assert_eq!(zone_positions.len(), names.len() + 1);
        debug_assert!(
            poly_zone_ids_is_sorted(&poly_zone_ids),
            "poly_zone_ids must be non-decreasing"
        );
        Self { names, poly_zone_ids, zone_positions }
    }

    /// Number of known zones.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.names.len()
    }

    /// Number of polygons across all zones.
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.poly_zone_ids.len()
    }

    /// Zone owning polygon `poly_id`.
    #[must_use]
    pub fn zone_id_of(&self, poly_id: PolyId) -> ZoneId {
        ZoneId::new(self.poly_zone_ids.get(poly_id.get() as usize))
    }

    /// Name of `zone_id`.
    #[must_use]
    pub fn zone_name_of(&self, zone_id: ZoneId) -> &str {
        &self.names[zone_id.get() as usize]
    }

    /// Contiguous polygon-id range owned by `zone_id` (§3).
    #[must_use]
    pub fn polygon_range_of(&self, zone_id: ZoneId) -> Range<u16> {
        let z = zone_id.get() as usize;
        self.zone_positions.get(z)..self.zone_positions.get(z + 1)
    }

    /// Every polygon id belonging to `zone_id` (§3 supplement: a
    /// convenience composition over `polygon_range_of`, mirroring the
    /// original implementation's `get_geometry`).
    pub fn polygons_of_zone(&self, zone_id: ZoneId) -> impl Iterator<Item = PolyId> {
        self.polygon_range_of(zone_id).map(PolyId::new)
    }

    /// True if `zone_name` names an ocean zone.
    #[must_use]
    pub fn is_ocean_zone(&self, zone_name: &str) -> bool {
        is_ocean_zone(zone_name)
    }
}

fn poly_zone_ids_is_sorted(ids: &ZoneIdVec) -> bool {
    let len = ids.len();
    (1..len).all(|i| ids.get(i - 1) <= ids.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ZoneTable {
        ZoneTable::from_parts(
            vec!["Europe/Berlin".to_owned(), "Etc/GMT-1".to_owned()],
            ZoneIdVec::U8(U8Column::Owned(vec![0, 0, 1])),
            U16Column::Owned(vec![0, 2, 3]),
        )
    }

    #[test]
    fn zone_id_of_and_name_of() {
        let table = sample();
        assert_eq!(table.zone_name_of(table.zone_id_of(PolyId::new(0))), "Europe/Berlin");
        assert_eq!(table.zone_name_of(table.zone_id_of(PolyId::new(2))), "Etc/GMT-1");
    }

    #[test]
    fn polygon_range_matches_positions() {
        let table = sample();
        assert_eq!(table.polygon_range_of(ZoneId::new(0)), 0..2);
        assert_eq!(table.polygon_range_of(ZoneId::new(1)), 2..3);
    }

    #[test]
    fn ocean_prefix() {
        assert!(is_ocean_zone("Etc/GMT+8"));
        assert!(!is_ocean_zone("Europe/Berlin"));
    }

    #[test]
    fn polygons_of_zone_matches_range() {
        let table = sample();
        let ids: Vec<_> = table.polygons_of_zone(ZoneId::new(0)).map(PolyId::get).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    #[should_panic(expected = "non-decreasing")]
    fn sortedness_invariant_is_enforced() {
        let _ = ZoneTable::from_parts(
            vec!["A".to_owned(), "B".to_owned()],
            ZoneIdVec::U8(U8Column::Owned(vec![1, 0])),
            U16Column::Owned(vec![0, 1, 2]),
        );
    }
}
