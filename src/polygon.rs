//! Polygon store: two parallel read-only tables (outer boundaries, holes),
//! each a variable-length sequence of integer vertices with a precomputed
//! bounding box (§3, §4.2).
//!
//! A table built in memory ([`PolygonTable::from_polygons`]) owns a flat
//! `Vec<i32>` of vertices. A table built from a loaded dataset
//! ([`PolygonTable::from_wire`]) instead keeps the original
//! `coordinates.fbs` payload alive as a [`Bytes`] and re-roots it on every
//! [`PolygonTable::coords_of`] call, so a memory-mapped dataset is never
//! copied into owned vertex storage (§5, §9 "In-memory vs. memory-mapped").

use crate::io::flatbuffers::polygons_generated;
use crate::io::npy::I32Column;
use crate::io::Bytes;
use flatbuffers::Vector;

/// An axis-aligned bounding box in the integer lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BBox {
    /// Minimum x (longitude ticks).
    pub xmin: i32,
    /// Maximum x (longitude ticks).
    pub xmax: i32,
    /// Minimum y (latitude ticks).
    pub ymin: i32,
    /// Maximum y (latitude ticks).
    pub ymax: i32,
}

impl BBox {
    /// Returns true if `(x, y)` lies within (inclusive) this box.
    #[must_use]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

/// A borrowed view over one polygon's vertex sequence: either a flat
/// `[x0, y0, x1, y1, ...]` slice, for a table built via
/// [`PolygonTable::from_polygons`], or a zero-copy FlatBuffers vector
/// re-rooted from the table's original buffer, for a loaded table.
#[derive(Clone, Copy, Debug)]
pub enum CoordsView<'a> {
    /// A flattened vertex slice owned directly by the table.
    Flat(&'a [i32]),
    /// A vertex vector borrowed straight out of the original FlatBuffers
    /// payload.
    Wire(Vector<'a, i32>),
}

impl<'a> CoordsView<'a> {
    /// Number of vertices (the polygon is implicitly closed: the last
    /// vertex is not duplicated).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(xy) => xy.len() / 2,
            Self::Wire(xy) => xy.len() / 2,
        }
    }

    /// True if the polygon has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the `i`-th vertex.
    #[must_use]
    pub fn get(&self, i: usize) -> (i32, i32) {
        match self {
            Self::Flat(xy) => (xy[i * 2], xy[i * 2 + 1]),
            Self::Wire(xy) => (xy.get(i * 2), xy.get(i * 2 + 1)),
        }
    }

    /// Iterates over every vertex as `(x, y)`.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + 'a {
        let this = *self;
        (0..this.len()).map(move |i| this.get(i))
    }
}

// -----------------------------------------------------------------------------

/// Where a table's vertex data actually lives.
#[derive(Debug)]
enum CoordsBacking {
    /// Flattened `[x0, y0, x1, y1, ...]` vertex array for every polygon,
    /// back to back, addressed via `offsets`.
    Flat {
        /// Offsets into `coords`, length `polygon_count() + 1`, in
        /// coordinate pairs (not raw i32 elements): polygon `p`'s vertices
        /// are `coords[2*offsets[p] .. 2*offsets[p+1]]`.
        offsets: Vec<u32>,
        coords: Vec<i32>,
    },
    /// The original `coordinates.fbs` payload, re-rooted and re-indexed on
    /// every access rather than flattened into owned storage up front.
    Wire(Bytes),
}

impl Default for CoordsBacking {
    fn default() -> Self {
        Self::Flat { offsets: Vec::new(), coords: Vec::new() }
    }
}

/// A read-only table of polygons: vertex data plus a precomputed bounding
/// box per polygon. Used for both the outer-boundary store and the hole
/// store (§3: "Holes are polygons too ... with identical invariants").
#[derive(Debug, Default)]
pub struct PolygonTable {
    coords: CoordsBacking,
    xmin: I32Column,
    xmax: I32Column,
    ymin: I32Column,
    ymax: I32Column,
}

impl PolygonTable {
    /// Builds a table whose vertices are read on demand from `bytes`, the
    /// original `coordinates.fbs` payload (§6). Used by
    /// [`crate::io::flatbuffers::parse_polygon_collection`], which has
    /// already validated that every polygon it describes is well-formed.
    pub(crate) fn from_wire(
        bytes: Bytes,
        xmin: I32Column,
        xmax: I32Column,
        ymin: I32Column,
        ymax: I32Column,
    ) -> Self {
        Self { coords: CoordsBacking::Wire(bytes), xmin, xmax, ymin, ymax }
    }

    /// Builds a table directly from a list of polygons (vertex lists),
    /// computing bounding boxes. Used by tests and by callers assembling a
    /// dataset without going through the on-disk loader.
    ///
    /// # Panics
    ///
    /// Panics if the total vertex count across all polygons exceeds
    /// `u32::MAX`.
    #[must_use]
    pub fn from_polygons(polygons: &[Vec<(i32, i32)>]) -> Self {
        let mut offsets = Vec::with_capacity(polygons.len() + 1);
        let mut coords = Vec::new();
        let (mut xmin, mut xmax, mut ymin, mut ymax) = (
            Vec::with_capacity(polygons.len()),
            Vec::with_capacity(polygons.len()),
            Vec::with_capacity(polygons.len()),
            Vec::with_capacity(polygons.len()),
        );
        offsets.push(0);
        for poly in polygons {
            let (mut bxmin, mut bxmax) = (i32::MAX, i32::MIN);
            let (mut bymin, mut bymax) = (i32::MAX, i32::MIN);
            for &(x, y) in poly {
                coords.push(x);
                coords.push(y);
                bxmin = bxmin.min(x);
                bxmax = bxmax.max(x);
                bymin = bymin.min(y);
                bymax = bymax.max(y);
            }
            xmin.push(bxmin);
            xmax.push(bxmax);
            ymin.push(bymin);
            ymax.push(bymax);
            offsets.push(u32::try_from(coords.len() / 2).expect("polygon count fits u32"));
        }
        Self {
            coords: CoordsBacking::Flat { offsets, coords },
            xmin: I32Column::Owned(xmin),
            xmax: I32Column::Owned(xmax),
            ymin: I32Column::Owned(ymin),
            ymax: I32Column::Owned(ymax),
        }
    }

    /// Number of polygons in this table.
    ///
    /// # Panics
    ///
    /// Panics if the table holds more than `u32::MAX` polygons.
    #[must_use]
    pub fn polygon_count(&self) -> u32 {
        u32::try_from(self.xmin.len()).expect("polygon count fits u32")
    }

    /// Bounding box of polygon `poly_id`.
    #[must_use]
    pub fn bbox_of(&self, poly_id: u16) -> BBox {
        let i = poly_id as usize;
        BBox {
            xmin: self.xmin.get(i),
            xmax: self.xmax.get(i),
            ymin: self.ymin.get(i),
            ymax: self.ymax.get(i),
        }
    }

    /// Vertex view of polygon `poly_id`.
    ///
    /// # Panics
    ///
    /// Panics if this table was built from a loaded `coordinates.fbs`
    /// payload that is no longer a well-formed `PolygonCollection`.
    /// Cannot happen in practice:
    /// [`crate::io::flatbuffers::parse_polygon_collection`] validates the
    /// same payload before building the table, and the backing buffer
    /// never changes for the table's lifetime.
    #[must_use]
    pub fn coords_of(&self, poly_id: u16) -> CoordsView<'_> {
        match &self.coords {
            CoordsBacking::Flat { offsets, coords } => {
                let i = poly_id as usize;
                let (start, end) = (offsets[i] as usize, offsets[i + 1] as usize);
                CoordsView::Flat(&coords[start * 2..end * 2])
            }
            CoordsBacking::Wire(bytes) => {
                let collection = polygons_generated::PolygonCollection::root(bytes.as_slice())
                    .expect("payload validated when the table was built");
                let polygon = collection
                    .polygons()
                    .expect("payload validated when the table was built")
                    .get(poly_id as usize);
                CoordsView::Wire(polygon.coords().expect("payload validated when the table was built"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_consistency() {
        let table = PolygonTable::from_polygons(&[vec![(0, 0), (10, 0), (10, 10), (0, 10)]]);
        let bbox = table.bbox_of(0);
        assert_eq!(bbox, BBox { xmin: 0, xmax: 10, ymin: 0, ymax: 10 });
        for (x, y) in table.coords_of(0).iter() {
            assert!(bbox.contains(x, y));
        }
    }

    #[test]
    fn multiple_polygons_offsets() {
        let table = PolygonTable::from_polygons(&[
            vec![(0, 0), (1, 0), (1, 1)],
            vec![(5, 5), (6, 5), (6, 6), (5, 6)],
        ]);
        assert_eq!(table.polygon_count(), 2);
        assert_eq!(table.coords_of(0).len(), 3);
        assert_eq!(table.coords_of(1).len(), 4);
        assert_eq!(table.coords_of(1).get(0), (5, 5));
    }
}
