//! Shortcut index: H3 cell id -> candidate polygon set, pruning the PIP
//! search (§3, §4.4).

use crate::zone::ZoneId;
use ahash::AHashMap;

/// One shortcut entry: either every candidate polygon shares a zone
/// (`UniqueZone`), or an ordered list of polygon ids must be tested in
/// turn (`PolygonList`).
///
/// A `PolygonList` of length 1 is read as equivalent to `UniqueZone`: the
/// build tool is not required to normalise it (§9 open question), so
/// readers must tolerate both forms. See [`ShortcutEntry::as_unique_poly`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShortcutEntry {
    /// Every polygon covering this cell belongs to `ZoneId`.
    UniqueZone(ZoneId),
    /// Ordered candidate polygon ids, grouped by zone per §3's "Shortcut
    /// ordering".
    PolygonList(Box<[u16]>),
}

impl ShortcutEntry {
    /// If this entry is unconditionally a single zone -- either because it
    /// is a `UniqueZone`, or because it is a `PolygonList` with exactly one
    /// candidate -- returns the polygon id to report, together with the
    /// zone resolver the caller must still apply for `PolygonList`.
    ///
    /// Returns `None` when a genuine multi-polygon scan is required.
    #[must_use]
    pub fn as_unique_poly(&self) -> Option<Option<u16>> {
        match self {
            Self::UniqueZone(_) => Some(None),
            Self::PolygonList(ids) if ids.len() == 1 => Some(Some(ids[0])),
            Self::PolygonList(_) => None,
        }
    }

    /// Candidate polygon ids for a `PolygonList`, or `None` for a
    /// `UniqueZone`.
    #[must_use]
    pub fn polygon_ids(&self) -> Option<&[u16]> {
        match self {
            Self::UniqueZone(_) => None,
            Self::PolygonList(ids) => Some(ids),
        }
    }
}

/// Dictionary keyed by H3 cell id at the build-time resolution `R`.
#[derive(Clone, Debug, Default)]
pub struct ShortcutIndex {
    entries: AHashMap<u64, ShortcutEntry>,
}

impl ShortcutIndex {
    /// Builds a shortcut index from an already-assembled map. Exposed
    /// alongside [`crate::TimezoneFinder::from_parts`] for callers
    /// assembling their own in-memory dataset instead of going through the
    /// on-disk loader.
    #[must_use]
    pub fn from_entries(entries: AHashMap<u64, ShortcutEntry>) -> Self {
        Self { entries }
    }

    /// Number of H3 cells with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the shortcut entry for `cell_id`.
    ///
    /// Returns `None` only for a non-global dataset whose coverage
    /// invariant (§3) does not hold for this cell.
    #[must_use]
    pub fn lookup(&self, cell_id: u64) -> Option<&ShortcutEntry> {
        self.entries.get(&cell_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_zone_round_trip() {
        let mut entries = AHashMap::default();
        entries.insert(42, ShortcutEntry::UniqueZone(ZoneId::new(3)));
        let index = ShortcutIndex::from_entries(entries);

        match index.lookup(42) {
            Some(ShortcutEntry::UniqueZone(z)) => assert_eq!(z.get(), 3),
            Some(_) | None => unreachable!("unexpected entry variant"),
        }
        assert!(index.lookup(43).is_none());
    }

    #[test]
    fn length_one_polygon_list_is_treated_as_unique() {
        let entry = ShortcutEntry::PolygonList(Box::new([7]));
        assert_eq!(entry.as_unique_poly(), Some(Some(7)));
    }

    #[test]
    fn unique_zone_as_unique_poly_has_no_poly_id() {
        let entry = ShortcutEntry::UniqueZone(ZoneId::new(0));
        assert_eq!(entry.as_unique_poly(), Some(None));
    }

    #[test]
    fn multi_polygon_list_requires_scan() {
        let entry = ShortcutEntry::PolygonList(Box::new([1, 2, 3]));
        assert_eq!(entry.as_unique_poly(), None);
        assert_eq!(entry.polygon_ids(), Some(&[1, 2, 3][..]));
    }
}
