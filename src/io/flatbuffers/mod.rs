//! Hand-maintained FlatBuffers bindings for the two on-disk schemas (§6),
//! plus conversion functions from the wire types into our owned
//! [`PolygonTable`](crate::polygon::PolygonTable) and
//! [`ShortcutIndex`](crate::shortcut::ShortcutIndex).

pub mod polygons_generated;
pub mod shortcuts_u16;
pub mod shortcuts_u8;

use crate::error::DataError;
use crate::io::npy::I32Column;
use crate::io::Bytes;
use crate::polygon::PolygonTable;
use crate::shortcut::{ShortcutEntry, ShortcutIndex};
use crate::zone::ZoneId;
use ahash::AHashMap;
use std::path::Path;

/// Validates a `PolygonCollection` buffer (`boundaries/coordinates.fbs` or
/// `holes/coordinates.fbs`) and pairs it with the bbox vectors read
/// separately from the matching `.npy` files (§6: bboxes and coordinates
/// are stored in separate artefacts), producing a [`PolygonTable`] that
/// keeps `bytes` alive and re-roots it on every vertex lookup instead of
/// copying the coordinates out (§5, §9).
///
/// # Errors
///
/// Returns [`DataError`] if `bytes` is not a valid `PolygonCollection`
/// buffer, its polygon count does not match the bbox vectors' length, or
/// any polygon's coordinate vector has an odd length.
pub fn parse_polygon_collection(
    bytes: Bytes,
    path: &Path,
    xmin: I32Column,
    xmax: I32Column,
    ymin: I32Column,
    ymax: I32Column,
) -> Result<PolygonTable, DataError> {
    let expected = xmin.len();
    {
        let collection = polygons_generated::PolygonCollection::root(bytes.as_slice())
            .map_err(|e| DataError::new(path, format!("invalid FlatBuffers: {e}")))?;
        let polygons = collection.polygons().ok_or_else(|| DataError::new(path, "missing polygons vector"))?;

        if polygons.len() != expected {
            return Err(DataError::new(
                path,
                format!("polygon count {} does not match bbox vector length {expected}", polygons.len()),
            ));
        }

        for polygon in polygons {
            let xy = polygon.coords().ok_or_else(|| DataError::new(path, "polygon missing coords vector"))?;
            if xy.len() % 2 != 0 {
                return Err(DataError::new(path, "polygon coords vector has odd length"));
            }
        }
    }

    Ok(PolygonTable::from_wire(bytes, xmin, xmax, ymin, ymax))
}

/// Parses a `hybrid_shortcuts_uint8.fbs` or `hybrid_shortcuts_uint16.fbs`
/// buffer (§6) into a [`ShortcutIndex`]. The zone-id width only affects
/// how `UniqueZone.zone_id` is decoded; `PolygonList.poly_ids` is always
/// `u16` (§6).
///
/// # Errors
///
/// Returns [`DataError`] if `bytes` is not a valid collection buffer for
/// `width`, or an entry's union value is missing.
pub fn parse_shortcuts(bytes: &[u8], path: &Path, width: ZoneIdWidth) -> Result<ShortcutIndex, DataError> {
    let mut entries = AHashMap::default();
    match width {
        ZoneIdWidth::U8 => {
            let collection = shortcuts_u8::HybridShortcutCollection::root(bytes)
                .map_err(|e| DataError::new(path, format!("invalid FlatBuffers: {e}")))?;
            let wire_entries =
                collection.entries().ok_or_else(|| DataError::new(path, "missing entries vector"))?;
            for wire in wire_entries {
                let entry = decode_entry_u8(&wire, path)?;
                entries.insert(wire.hex_id(), entry);
            }
        }
        ZoneIdWidth::U16 => {
            let collection = shortcuts_u16::HybridShortcutCollection::root(bytes)
                .map_err(|e| DataError::new(path, format!("invalid FlatBuffers: {e}")))?;
            let wire_entries =
                collection.entries().ok_or_else(|| DataError::new(path, "missing entries vector"))?;
            for wire in wire_entries {
                let entry = decode_entry_u16(&wire, path)?;
                entries.insert(wire.hex_id(), entry);
            }
        }
    }
    Ok(ShortcutIndex::from_entries(entries))
}

/// Which `hybrid_shortcuts_uintN.fbs` variant a dataset was built with,
/// chosen by the build tool from `nr_zones` the same way as
/// `poly_zone_ids.npy`'s dtype (§3, §6).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ZoneIdWidth {
    /// `hybrid_shortcuts_uint8.fbs`: `UniqueZone.zone_id` is `u8`.
    U8,
    /// `hybrid_shortcuts_uint16.fbs`: `UniqueZone.zone_id` is `u16`.
    U16,
}

fn decode_entry_u8(wire: &shortcuts_u8::HybridShortcutEntry<'_>, path: &Path) -> Result<ShortcutEntry, DataError> {
    if let Some(unique) = wire.value_as_unique_zone() {
        return Ok(ShortcutEntry::UniqueZone(ZoneId::new(u16::from(unique.zone_id()))));
    }
    if let Some(list) = wire.value_as_polygon_list() {
        let ids = list.poly_ids().ok_or_else(|| DataError::new(path, "PolygonList missing poly_ids"))?;
        return Ok(ShortcutEntry::PolygonList(ids.iter().collect::<Vec<u16>>().into_boxed_slice()));
    }
    Err(DataError::new(path, format!("shortcut entry for hex {:#x} has no union value", wire.hex_id())))
}

fn decode_entry_u16(wire: &shortcuts_u16::HybridShortcutEntry<'_>, path: &Path) -> Result<ShortcutEntry, DataError> {
    if let Some(unique) = wire.value_as_unique_zone() {
        return Ok(ShortcutEntry::UniqueZone(ZoneId::new(unique.zone_id())));
    }
    if let Some(list) = wire.value_as_polygon_list() {
        let ids = list.poly_ids().ok_or_else(|| DataError::new(path, "PolygonList missing poly_ids"))?;
        return Ok(ShortcutEntry::PolygonList(ids.iter().collect::<Vec<u16>>().into_boxed_slice()));
    }
    Err(DataError::new(path, format!("shortcut entry for hex {:#x} has no union value", wire.hex_id())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatbuffers::FlatBufferBuilder;

    #[test]
    fn round_trips_polygon_collection() {
        let mut fbb = FlatBufferBuilder::new();
        let coords = fbb.create_vector(&[0i32, 0, 10, 0, 10, 10]);
        let polygon = polygons_generated::Polygon::create(&mut fbb, coords);
        let polygons = fbb.create_vector(&[polygon]);
        let collection = polygons_generated::PolygonCollection::create(&mut fbb, polygons);
        fbb.finish(collection, None);
        let bytes = fbb.finished_data();

        let table = parse_polygon_collection(
            Bytes::owned(bytes.to_vec()),
            Path::new("x"),
            I32Column::Owned(vec![0]),
            I32Column::Owned(vec![10]),
            I32Column::Owned(vec![0]),
            I32Column::Owned(vec![10]),
        )
        .expect("well-formed flatbuffer payload");
        assert_eq!(table.polygon_count(), 1);
        assert_eq!(table.coords_of(0).len(), 3);
    }

    #[test]
    fn round_trips_unique_zone_shortcut_u16() {
        let mut fbb = FlatBufferBuilder::new();
        let unique = shortcuts_u16::UniqueZone::create(&mut fbb, 300);
        let entry = shortcuts_u16::HybridShortcutEntry::create(
            &mut fbb,
            42,
            shortcuts_u16::ShortcutValue::UniqueZone,
            unique.as_union_value(),
        );
        let entries = fbb.create_vector(&[entry]);
        let collection = shortcuts_u16::HybridShortcutCollection::create(&mut fbb, entries);
        fbb.finish(collection, None);
        let bytes = fbb.finished_data();

        let index = parse_shortcuts(bytes, Path::new("x"), ZoneIdWidth::U16)
            .expect("well-formed flatbuffer payload");
        match index.lookup(42) {
            Some(ShortcutEntry::UniqueZone(z)) => assert_eq!(z.get(), 300),
            Some(_) | None => unreachable!("unexpected entry variant"),
        }
    }

    #[test]
    fn round_trips_polygon_list_shortcut_u8() {
        let mut fbb = FlatBufferBuilder::new();
        let poly_ids = fbb.create_vector(&[3u16, 7, 9]);
        let list = shortcuts_u8::PolygonList::create(&mut fbb, poly_ids);
        let entry = shortcuts_u8::HybridShortcutEntry::create(
            &mut fbb,
            99,
            shortcuts_u8::ShortcutValue::PolygonList,
            list.as_union_value(),
        );
        let entries = fbb.create_vector(&[entry]);
        let collection = shortcuts_u8::HybridShortcutCollection::create(&mut fbb, entries);
        fbb.finish(collection, None);
        let bytes = fbb.finished_data();

        let index = parse_shortcuts(bytes, Path::new("x"), ZoneIdWidth::U8)
            .expect("well-formed flatbuffer payload");
        match index.lookup(99) {
            Some(ShortcutEntry::PolygonList(ids)) => assert_eq!(&**ids, &[3, 7, 9]),
            Some(_) | None => unreachable!("unexpected entry variant"),
        }
    }
}
