// Hand-maintained equivalent of `flatc --rust` output for
// `hybrid_shortcuts_uint8.fbs` (§6), used when `nr_zones <= 256`. Same
// shape as `shortcuts_u16.rs`, differing only in `UniqueZone.zone_id`'s
// width -- kept as a separate module rather than a generic type because
// the original Python implementation generates (and imports) two
// distinct schema modules per zone-id width rather than parameterizing
// one.

#![allow(
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::undocumented_unsafe_blocks,
    missing_docs,
    unsafe_code,
    reason = "generated-style bindings mirroring flatc's own raw-table-access output, not hand-documented or hand-audited like the rest of the crate"
)]

use flatbuffers::{
    FlatBufferBuilder, Follow, ForwardsUOffset, InvalidFlatbuffer, Table, UnionWIPOffset,
    Verifiable, Verifier, Vector, VOffsetT, WIPOffset,
};

pub use super::shortcuts_u16::ShortcutValue;

// -----------------------------------------------------------------------------
// UniqueZone

#[derive(Copy, Clone, PartialEq)]
pub struct UniqueZone<'a> {
    tab: Table<'a>,
}

impl<'a> Follow<'a> for UniqueZone<'a> {
    type Inner = Self;

    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Self { tab: Table::new(buf, loc) }
    }
}

impl<'a> UniqueZone<'a> {
    const VT_ZONE_ID: VOffsetT = 4;

    #[must_use]
    pub fn zone_id(&self) -> u8 {
        // SAFETY: field type matches the schema's `zone_id: uint8`.
        unsafe { self.tab.get::<u8>(Self::VT_ZONE_ID, Some(0)).unwrap_or(0) }
    }

    pub fn create(fbb: &mut FlatBufferBuilder<'a>, zone_id: u8) -> WIPOffset<Self> {
        let mut builder = UniqueZoneBuilder::new(fbb);
        builder.add_zone_id(zone_id);
        builder.finish()
    }
}

pub struct UniqueZoneBuilder<'a, 'b> {
    fbb: &'b mut FlatBufferBuilder<'a>,
    start: WIPOffset<flatbuffers::TableUnfinishedWIPOffset>,
}

impl<'a, 'b> UniqueZoneBuilder<'a, 'b> {
    pub fn new(fbb: &'b mut FlatBufferBuilder<'a>) -> Self {
        let start = fbb.start_table();
        Self { fbb, start }
    }

    pub fn add_zone_id(&mut self, zone_id: u8) {
        self.fbb.push_slot::<u8>(UniqueZone::VT_ZONE_ID, zone_id, 0);
    }

    pub fn finish(self) -> WIPOffset<UniqueZone<'a>> {
        let end = self.fbb.end_table(self.start);
        WIPOffset::new(end.value())
    }
}

impl<'a> Verifiable for UniqueZone<'a> {
    #[inline]
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<u8>("zone_id", Self::VT_ZONE_ID, false)?
            .finish();
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// PolygonList (poly ids are always stored as u16, §3: "Polygon ids are
// always stored as unsigned 16-bit integers").

#[derive(Copy, Clone, PartialEq)]
pub struct PolygonList<'a> {
    tab: Table<'a>,
}

impl<'a> Follow<'a> for PolygonList<'a> {
    type Inner = Self;

    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Self { tab: Table::new(buf, loc) }
    }
}

impl<'a> PolygonList<'a> {
    const VT_POLY_IDS: VOffsetT = 4;

    #[must_use]
    pub fn poly_ids(&self) -> Option<Vector<'a, u16>> {
        // SAFETY: field type matches the schema's `poly_ids: [uint16]`.
        unsafe { self.tab.get::<ForwardsUOffset<Vector<'a, u16>>>(Self::VT_POLY_IDS, None) }
    }

    pub fn create(fbb: &mut FlatBufferBuilder<'a>, poly_ids: WIPOffset<Vector<'a, u16>>) -> WIPOffset<Self> {
        let mut builder = PolygonListBuilder::new(fbb);
        builder.add_poly_ids(poly_ids);
        builder.finish()
    }
}

pub struct PolygonListBuilder<'a, 'b> {
    fbb: &'b mut FlatBufferBuilder<'a>,
    start: WIPOffset<flatbuffers::TableUnfinishedWIPOffset>,
}

impl<'a, 'b> PolygonListBuilder<'a, 'b> {
    pub fn new(fbb: &'b mut FlatBufferBuilder<'a>) -> Self {
        let start = fbb.start_table();
        Self { fbb, start }
    }

    pub fn add_poly_ids(&mut self, poly_ids: WIPOffset<Vector<'a, u16>>) {
        self.fbb.push_slot_always::<WIPOffset<_>>(PolygonList::VT_POLY_IDS, poly_ids);
    }

    pub fn finish(self) -> WIPOffset<PolygonList<'a>> {
        let end = self.fbb.end_table(self.start);
        WIPOffset::new(end.value())
    }
}

impl<'a> Verifiable for PolygonList<'a> {
    #[inline]
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<Vector<'_, u16>>>("poly_ids", Self::VT_POLY_IDS, false)?
            .finish();
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// HybridShortcutEntry

#[derive(Copy, Clone, PartialEq)]
pub struct HybridShortcutEntry<'a> {
    tab: Table<'a>,
}

impl<'a> Follow<'a> for HybridShortcutEntry<'a> {
    type Inner = Self;

    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Self { tab: Table::new(buf, loc) }
    }
}

impl<'a> HybridShortcutEntry<'a> {
    const VT_HEX_ID: VOffsetT = 4;
    const VT_VALUE_TYPE: VOffsetT = 6;
    const VT_VALUE: VOffsetT = 8;

    #[must_use]
    pub fn hex_id(&self) -> u64 {
        // SAFETY: field type matches the schema's `hex_id: uint64`.
        unsafe { self.tab.get::<u64>(Self::VT_HEX_ID, Some(0)).unwrap_or(0) }
    }

    #[must_use]
    pub fn value_type(&self) -> ShortcutValue {
        // SAFETY: field type matches the union discriminant, stored as u8.
        let raw = unsafe { self.tab.get::<u8>(Self::VT_VALUE_TYPE, Some(0)).unwrap_or(0) };
        ShortcutValue::from_byte(raw).unwrap_or(ShortcutValue::None)
    }

    #[must_use]
    pub fn value_as_unique_zone(&self) -> Option<UniqueZone<'a>> {
        if self.value_type() != ShortcutValue::UniqueZone {
            return None;
        }
        // SAFETY: guarded by the discriminant check above.
        unsafe { self.tab.get::<ForwardsUOffset<UniqueZone<'a>>>(Self::VT_VALUE, None) }
    }

    #[must_use]
    pub fn value_as_polygon_list(&self) -> Option<PolygonList<'a>> {
        if self.value_type() != ShortcutValue::PolygonList {
            return None;
        }
        // SAFETY: guarded by the discriminant check above.
        unsafe { self.tab.get::<ForwardsUOffset<PolygonList<'a>>>(Self::VT_VALUE, None) }
    }

    pub fn create(
        fbb: &mut FlatBufferBuilder<'a>,
        hex_id: u64,
        value_type: ShortcutValue,
        value: WIPOffset<UnionWIPOffset>,
    ) -> WIPOffset<Self> {
        let mut builder = HybridShortcutEntryBuilder::new(fbb);
        builder.add_hex_id(hex_id);
        builder.add_value_type(value_type);
        builder.add_value(value);
        builder.finish()
    }
}

pub struct HybridShortcutEntryBuilder<'a, 'b> {
    fbb: &'b mut FlatBufferBuilder<'a>,
    start: WIPOffset<flatbuffers::TableUnfinishedWIPOffset>,
}

impl<'a, 'b> HybridShortcutEntryBuilder<'a, 'b> {
    pub fn new(fbb: &'b mut FlatBufferBuilder<'a>) -> Self {
        let start = fbb.start_table();
        Self { fbb, start }
    }

    pub fn add_hex_id(&mut self, hex_id: u64) {
        self.fbb.push_slot::<u64>(HybridShortcutEntry::VT_HEX_ID, hex_id, 0);
    }

    pub fn add_value_type(&mut self, value_type: ShortcutValue) {
        self.fbb
            .push_slot::<u8>(HybridShortcutEntry::VT_VALUE_TYPE, value_type as u8, 0);
    }

    pub fn add_value(&mut self, value: WIPOffset<UnionWIPOffset>) {
        self.fbb
            .push_slot_always::<WIPOffset<_>>(HybridShortcutEntry::VT_VALUE, value);
    }

    pub fn finish(self) -> WIPOffset<HybridShortcutEntry<'a>> {
        let end = self.fbb.end_table(self.start);
        WIPOffset::new(end.value())
    }
}

impl<'a> Verifiable for HybridShortcutEntry<'a> {
    #[inline]
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<u64>("hex_id", Self::VT_HEX_ID, false)?
            .visit_union::<u8, _>(
                "value_type",
                Self::VT_VALUE_TYPE,
                "value",
                Self::VT_VALUE,
                false,
                |key, v, pos| match ShortcutValue::from_byte(key).unwrap_or(ShortcutValue::None) {
                    ShortcutValue::None => Ok(()),
                    ShortcutValue::UniqueZone => v
                        .verify_union_variant::<ForwardsUOffset<UniqueZone<'_>>>("ShortcutValue::UniqueZone", pos),
                    ShortcutValue::PolygonList => v
                        .verify_union_variant::<ForwardsUOffset<PolygonList<'_>>>("ShortcutValue::PolygonList", pos),
                },
            )?
            .finish();
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// HybridShortcutCollection

#[derive(Copy, Clone, PartialEq)]
pub struct HybridShortcutCollection<'a> {
    tab: Table<'a>,
}

impl<'a> Follow<'a> for HybridShortcutCollection<'a> {
    type Inner = Self;

    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Self { tab: Table::new(buf, loc) }
    }
}

impl<'a> HybridShortcutCollection<'a> {
    const VT_ENTRIES: VOffsetT = 4;

    /// Parses the root `HybridShortcutCollection` out of a FlatBuffers
    /// buffer.
    pub fn root(buf: &'a [u8]) -> Result<Self, InvalidFlatbuffer> {
        flatbuffers::root::<Self>(buf)
    }

    #[must_use]
    pub fn entries(&self) -> Option<Vector<'a, ForwardsUOffset<HybridShortcutEntry<'a>>>> {
        // SAFETY: field type matches the schema's `entries: [HybridShortcutEntry]`.
        unsafe {
            self.tab
                .get::<ForwardsUOffset<Vector<'a, ForwardsUOffset<HybridShortcutEntry<'a>>>>>(
                    Self::VT_ENTRIES,
                    None,
                )
        }
    }

    pub fn create(
        fbb: &mut FlatBufferBuilder<'a>,
        entries: WIPOffset<Vector<'a, ForwardsUOffset<HybridShortcutEntry<'a>>>>,
    ) -> WIPOffset<Self> {
        let mut builder = HybridShortcutCollectionBuilder::new(fbb);
        builder.add_entries(entries);
        builder.finish()
    }
}

pub struct HybridShortcutCollectionBuilder<'a, 'b> {
    fbb: &'b mut FlatBufferBuilder<'a>,
    start: WIPOffset<flatbuffers::TableUnfinishedWIPOffset>,
}

impl<'a, 'b> HybridShortcutCollectionBuilder<'a, 'b> {
    pub fn new(fbb: &'b mut FlatBufferBuilder<'a>) -> Self {
        let start = fbb.start_table();
        Self { fbb, start }
    }

    pub fn add_entries(&mut self, entries: WIPOffset<Vector<'a, ForwardsUOffset<HybridShortcutEntry<'a>>>>) {
        self.fbb
            .push_slot_always::<WIPOffset<_>>(HybridShortcutCollection::VT_ENTRIES, entries);
    }

    pub fn finish(self) -> WIPOffset<HybridShortcutCollection<'a>> {
        let end = self.fbb.end_table(self.start);
        WIPOffset::new(end.value())
    }
}

impl<'a> Verifiable for HybridShortcutCollection<'a> {
    #[inline]
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<HybridShortcutEntry<'_>>>>>(
                "entries",
                Self::VT_ENTRIES,
                false,
            )?
            .finish();
        Ok(())
    }
}
