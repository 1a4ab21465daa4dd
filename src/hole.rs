//! Hole registry: sparse outer-polygon id -> (hole count, first hole id)
//! (§3).

use crate::zone::PolyId;
use ahash::AHashMap;

/// The hole ids of a polygon, a contiguous range in the hole store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoleRange {
    /// Number of holes.
    pub count: u16,
    /// First hole id.
    pub first_id: u16,
}

impl HoleRange {
    /// Iterates over the hole ids in this range.
    #[must_use]
    pub fn ids(self) -> impl Iterator<Item = u16> {
        self.first_id..self.first_id + self.count
    }
}

/// Sparse map from outer-polygon id to its hole range. Most polygons have
/// no holes at all, so a hash map (rather than a dense vector sized to the
/// whole polygon store) keeps memory proportional to the number of
/// polygons that actually have holes.
#[derive(Clone, Debug, Default)]
pub struct HoleRegistry {
    entries: AHashMap<u16, HoleRange>,
}

impl HoleRegistry {
    /// Builds a hole registry from an already-assembled map. Exposed
    /// alongside [`crate::TimezoneFinder::from_parts`] for callers
    /// assembling their own in-memory dataset instead of going through the
    /// on-disk loader.
    #[must_use]
    pub fn from_entries(entries: AHashMap<u16, HoleRange>) -> Self {
        Self { entries }
    }

    /// Hole range for `poly_id`, if it has any holes.
    #[must_use]
    pub fn holes_of(&self, poly_id: PolyId) -> Option<HoleRange> {
        self.entries.get(&poly_id.get()).copied()
    }

    /// Number of outer polygons that have at least one hole.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no polygon has any hole.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_polygon_has_no_holes() {
        let registry = HoleRegistry::default();
        assert_eq!(registry.holes_of(PolyId::new(0)), None);
    }

    #[test]
    fn hole_ids_form_contiguous_range() {
        let mut entries = AHashMap::default();
        entries.insert(3, HoleRange { count: 2, first_id: 10 });
        let registry = HoleRegistry::from_entries(entries);

        let range = registry.holes_of(PolyId::new(3)).expect("polygon 3 has holes");
        assert_eq!(range.ids().collect::<Vec<_>>(), vec![10, 11]);
    }
}
