// Hand-maintained equivalent of `flatc --rust` output for the
// `PolygonCollection` schema (§6). Kept in source control the same way
// geozero checks in its prost-generated `mvt::vector_tile` module: update
// this file by hand when the schema in spec §6 changes, there is no
// `build.rs` invoking `flatc` in this crate.
//
// ```
// table Polygon { coords: [int32]; }
// table PolygonCollection { polygons: [Polygon]; }
// ```

#![allow(
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::undocumented_unsafe_blocks,
    missing_docs,
    unsafe_code,
    reason = "generated-style bindings mirroring flatc's own raw-table-access output, not hand-documented or hand-audited like the rest of the crate"
)]

use flatbuffers::{
    FlatBufferBuilder, Follow, ForwardsUOffset, InvalidFlatbuffer, Table, Vector, Verifiable,
    Verifier, VOffsetT, WIPOffset,
};

// -----------------------------------------------------------------------------
// Polygon

#[derive(Copy, Clone, PartialEq)]
pub struct Polygon<'a> {
    pub(crate) tab: Table<'a>,
}

impl<'a> Follow<'a> for Polygon<'a> {
    type Inner = Self;

    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Self { tab: Table::new(buf, loc) }
    }
}

impl<'a> Polygon<'a> {
    const VT_COORDS: VOffsetT = 4;

    /// Flattened `[x0, y0, x1, y1, ...]` vertex array.
    #[must_use]
    pub fn coords(&self) -> Option<Vector<'a, i32>> {
        // SAFETY: field type matches the schema's `coords: [int32]`.
        unsafe { self.tab.get::<ForwardsUOffset<Vector<'a, i32>>>(Self::VT_COORDS, None) }
    }

    pub fn create(fbb: &mut FlatBufferBuilder<'a>, coords: WIPOffset<Vector<'a, i32>>) -> WIPOffset<Self> {
        let mut builder = PolygonBuilder::new(fbb);
        builder.add_coords(coords);
        builder.finish()
    }
}

pub struct PolygonBuilder<'a, 'b> {
    fbb: &'b mut FlatBufferBuilder<'a>,
    start: WIPOffset<flatbuffers::TableUnfinishedWIPOffset>,
}

impl<'a, 'b> PolygonBuilder<'a, 'b> {
    pub fn new(fbb: &'b mut FlatBufferBuilder<'a>) -> Self {
        let start = fbb.start_table();
        Self { fbb, start }
    }

    pub fn add_coords(&mut self, coords: WIPOffset<Vector<'a, i32>>) {
        self.fbb.push_slot_always::<WIPOffset<_>>(Polygon::VT_COORDS, coords);
    }

    pub fn finish(self) -> WIPOffset<Polygon<'a>> {
        let end = self.fbb.end_table(self.start);
        WIPOffset::new(end.value())
    }
}

impl<'a> Verifiable for Polygon<'a> {
    #[inline]
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<Vector<'_, i32>>>("coords", Self::VT_COORDS, false)?
            .finish();
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// PolygonCollection

#[derive(Copy, Clone, PartialEq)]
pub struct PolygonCollection<'a> {
    tab: Table<'a>,
}

impl<'a> Follow<'a> for PolygonCollection<'a> {
    type Inner = Self;

    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Self { tab: Table::new(buf, loc) }
    }
}

impl<'a> PolygonCollection<'a> {
    const VT_POLYGONS: VOffsetT = 4;

    /// Parses the root `PolygonCollection` out of a FlatBuffers buffer.
    pub fn root(buf: &'a [u8]) -> Result<Self, InvalidFlatbuffer> {
        flatbuffers::root::<Self>(buf)
    }

    #[must_use]
    pub fn polygons(&self) -> Option<Vector<'a, ForwardsUOffset<Polygon<'a>>>> {
        // SAFETY: field type matches the schema's `polygons: [Polygon]`.
        unsafe {
            self.tab
                .get::<ForwardsUOffset<Vector<'a, ForwardsUOffset<Polygon<'a>>>>>(Self::VT_POLYGONS, None)
        }
    }

    pub fn create(
        fbb: &mut FlatBufferBuilder<'a>,
        polygons: WIPOffset<Vector<'a, ForwardsUOffset<Polygon<'a>>>>,
    ) -> WIPOffset<Self> {
        let mut builder = PolygonCollectionBuilder::new(fbb);
        builder.add_polygons(polygons);
        builder.finish()
    }
}

pub struct PolygonCollectionBuilder<'a, 'b> {
    fbb: &'b mut FlatBufferBuilder<'a>,
    start: WIPOffset<flatbuffers::TableUnfinishedWIPOffset>,
}

impl<'a, 'b> PolygonCollectionBuilder<'a, 'b> {
    pub fn new(fbb: &'b mut FlatBufferBuilder<'a>) -> Self {
        let start = fbb.start_table();
        Self { fbb, start }
    }

    pub fn add_polygons(&mut self, polygons: WIPOffset<Vector<'a, ForwardsUOffset<Polygon<'a>>>>) {
        self.fbb
            .push_slot_always::<WIPOffset<_>>(PolygonCollection::VT_POLYGONS, polygons);
    }

    pub fn finish(self) -> WIPOffset<PolygonCollection<'a>> {
        let end = self.fbb.end_table(self.start);
        WIPOffset::new(end.value())
    }
}

impl<'a> Verifiable for PolygonCollection<'a> {
    #[inline]
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<Polygon<'_>>>>>(
                "polygons",
                Self::VT_POLYGONS,
                false,
            )?
            .finish();
        Ok(())
    }
}
