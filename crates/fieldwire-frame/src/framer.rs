use bytes::{Bytes, BytesMut};
use fieldwire_codec::{self as codec, BufferLease, BufferPool, CodecError};
use fieldwire_schema::{schema_of, FieldDef, HeaderTemplate, Record, Schema};

use crate::error::{FrameError, Result};
use crate::layout::{
    ENTITY_INDEX_OFFSET, FIELD_COUNT_OFFSET, FIXED_HEADER_SIZE, HEADER_FLAG_OFFSET,
    TOTAL_SIZE_OFFSET,
};

/// Which header layout a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// Self-describing: every field's index (and size, if variable) is in
    /// the header, so any reader with the schema registered can decode.
    Explicit,
    /// Positional: index entries omitted, only variable-field sizes are
    /// written. Smaller, but decodable only with out-of-band schema
    /// knowledge — this crate refuses to deserialize it.
    Implicit,
}

/// Total encoded size of `record` in the given mode, header included.
pub fn serialized_size<T: Record>(record: &T, mode: HeaderMode) -> Result<usize> {
    let schema = schema_of::<T>()?;
    Ok(message_size(record, &schema, mode))
}

/// Serialize `record` into a freshly allocated buffer.
///
/// The buffer is exactly the message size; its first four bytes always
/// read back as the buffer's own length.
pub fn serialize<T: Record>(record: &T, mode: HeaderMode) -> Result<Bytes> {
    let schema = schema_of::<T>()?;
    let total = message_size(record, &schema, mode);
    let mut buf = BytesMut::zeroed(total);
    write_message(record, &schema, mode, &mut buf)?;
    Ok(buf.freeze())
}

/// Serialize `record` into pooled storage instead of a fresh allocation.
///
/// Same bytes as [`serialize`]; the lease returns its storage to `pool`
/// when dropped or released.
pub fn serialize_into_lease<'p, T: Record>(
    record: &T,
    mode: HeaderMode,
    pool: &'p BufferPool,
) -> Result<BufferLease<'p>> {
    let schema = schema_of::<T>()?;
    let total = message_size(record, &schema, mode);
    let mut lease = pool.rent(total);
    write_message(record, &schema, mode, lease.as_mut_slice())?;
    Ok(lease)
}

/// Deserialize an explicit-header message from `src` into `target`,
/// returning bytes consumed.
///
/// The whole header is parsed and resolved against the schema before any
/// field writer runs, so an unknown field index fails without mutating
/// `target`. A codec failure while applying the data region (for example
/// a corrupt variable size pointing past the message) leaves the fields
/// already applied assigned.
///
/// Implicit-header messages are rejected with
/// [`FrameError::ImplicitHeader`]: positional decoding would require
/// schema knowledge the wire does not carry.
pub fn deserialize<T: Record>(src: &[u8], target: &mut T) -> Result<usize> {
    let schema = schema_of::<T>()?;

    if src.len() < FIXED_HEADER_SIZE {
        return Err(FrameError::HeaderTooShort { len: src.len() });
    }
    let declared = codec::read::<i32>(src, TOTAL_SIZE_OFFSET)?;
    if declared < FIXED_HEADER_SIZE as i32 {
        return Err(FrameError::InvalidTotalSize(declared));
    }
    let total = declared as usize;
    if src.len() < total {
        return Err(FrameError::Truncated {
            declared: total,
            actual: src.len(),
        });
    }
    // Everything past the declared size belongs to the next message.
    let msg = &src[..total];

    if !codec::read::<bool>(msg, HEADER_FLAG_OFFSET)? {
        return Err(FrameError::ImplicitHeader);
    }
    let entity = codec::read::<u16>(msg, ENTITY_INDEX_OFFSET)?;
    if entity != schema.entity_index() {
        return Err(FrameError::EntityMismatch {
            expected: schema.entity_index(),
            found: entity,
        });
    }
    let field_count = codec::read::<u16>(msg, FIELD_COUNT_OFFSET)?;

    // Resolve every header entry before touching the target.
    let mut plan: Vec<(&FieldDef<T>, usize)> = Vec::with_capacity(usize::from(field_count));
    let mut cursor = FIXED_HEADER_SIZE;
    for _ in 0..field_count {
        let index = codec::read::<u16>(msg, cursor)?;
        cursor += 2;
        let field = schema
            .field_by_index(index)
            .ok_or(FrameError::UnknownFieldIndex { index })?;
        let len = if field.is_variable() {
            let size = codec::read::<i32>(msg, cursor)?;
            cursor += 4;
            usize::try_from(size).map_err(|_| FrameError::InvalidFieldSize { index, size })?
        } else {
            field.fixed_width()
        };
        plan.push((field, len));
    }

    // Apply field writers in header-declared order against the data region.
    for (field, len) in plan {
        cursor += field.decode(target, msg, cursor, len)?;
    }

    Ok(total)
}

fn template<T>(schema: &Schema<T>, mode: HeaderMode) -> &HeaderTemplate {
    match mode {
        HeaderMode::Explicit => schema.explicit_header(),
        HeaderMode::Implicit => schema.implicit_header(),
    }
}

fn message_size<T>(record: &T, schema: &Schema<T>, mode: HeaderMode) -> usize {
    let variable: usize = schema
        .fields()
        .iter()
        .filter(|f| f.is_variable())
        .map(|f| f.wire_size(record))
        .sum();
    template(schema, mode).len() + schema.fixed_data_size() + variable
}

/// Write one complete message into `out`, which must hold the full size.
/// Returns the total message size.
fn write_message<T>(
    record: &T,
    schema: &Schema<T>,
    mode: HeaderMode,
    out: &mut [u8],
) -> Result<usize> {
    let header = template(schema, mode);
    let total = message_size(record, schema, mode);
    if total > i32::MAX as usize {
        return Err(FrameError::MessageTooLarge { size: total });
    }
    if out.len() < total {
        return Err(FrameError::Codec(CodecError::InsufficientCapacity {
            needed: total,
            available: out.len(),
        }));
    }

    out[..header.len()].copy_from_slice(header.bytes());

    let mut slots = header.size_slots().iter();
    let mut cursor = header.len();
    for (pos, field) in schema.fields().iter().enumerate() {
        let written = field.encode(record, out, cursor)?;
        if field.is_variable() {
            // Slots are emitted in schema order, one per variable field.
            if let Some(slot) = slots.next().filter(|s| s.field_pos == pos) {
                codec::write(written as i32, out, slot.offset)?;
            }
        }
        cursor += written;
    }

    // Backfilled last: the total depends on every variable field's size.
    codec::write(total as i32, out, TOTAL_SIZE_OFFSET)?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwire_schema::FieldDef;

    #[derive(Debug, Default, PartialEq)]
    struct Player {
        id: i32,
        name: String,
    }

    impl Record for Player {
        const ENTITY_INDEX: u16 = 7;

        fn fields() -> Vec<FieldDef<Self>> {
            vec![
                FieldDef::scalar("id", 0, |p: &Player| p.id, |p, v| p.id = v),
                FieldDef::utf8("name", 1, |p: &Player| p.name.as_str(), |p, v| p.name = v),
            ]
        }
    }

    fn player() -> Player {
        Player {
            id: 42,
            name: "ab".into(),
        }
    }

    #[test]
    fn explicit_round_trip_with_exact_layout() {
        let buf = serialize(&player(), HeaderMode::Explicit).unwrap();

        // 9 fixed + (2) + (2 + 4) header, then 4 + 2 data.
        assert_eq!(buf.len(), 23);
        assert_eq!(&buf[0..4], &[23, 0, 0, 0]); // total size
        assert_eq!(buf[4], 1); // explicit flag
        assert_eq!(&buf[5..7], &[7, 0]); // entity index
        assert_eq!(&buf[7..9], &[2, 0]); // field count
        assert_eq!(&buf[9..11], &[0, 0]); // field 0 index
        assert_eq!(&buf[11..13], &[1, 0]); // field 1 index
        assert_eq!(&buf[13..17], &[2, 0, 0, 0]); // field 1 byte size
        assert_eq!(&buf[17..21], &[42, 0, 0, 0]); // id
        assert_eq!(&buf[21..23], b"ab"); // name

        let mut decoded = Player::default();
        assert_eq!(deserialize(&buf, &mut decoded).unwrap(), 23);
        assert_eq!(decoded, player());
    }

    #[test]
    fn implicit_layout_omits_index_entries() {
        let buf = serialize(&player(), HeaderMode::Implicit).unwrap();

        // 9 fixed + one size slot, then 4 + 2 data.
        assert_eq!(buf.len(), 19);
        assert_eq!(&buf[0..4], &[19, 0, 0, 0]);
        assert_eq!(buf[4], 0); // implicit flag
        assert_eq!(&buf[9..13], &[2, 0, 0, 0]); // name byte size, schema order
        assert_eq!(&buf[13..17], &[42, 0, 0, 0]);
        assert_eq!(&buf[17..19], b"ab");
    }

    #[test]
    fn total_size_field_always_equals_buffer_length() {
        for mode in [HeaderMode::Explicit, HeaderMode::Implicit] {
            for name in ["", "x", "a longer name with unicode é🦀"] {
                let record = Player {
                    id: -1,
                    name: name.into(),
                };
                let buf = serialize(&record, mode).unwrap();
                let declared = codec::read::<i32>(&buf, 0).unwrap();
                assert_eq!(declared as usize, buf.len());
                assert_eq!(buf.len(), serialized_size(&record, mode).unwrap());
            }
        }
    }

    #[test]
    fn implicit_message_is_rejected_on_deserialize() {
        let buf = serialize(&player(), HeaderMode::Implicit).unwrap();
        let mut target = Player::default();
        assert!(matches!(
            deserialize(&buf, &mut target),
            Err(FrameError::ImplicitHeader)
        ));
    }

    #[test]
    fn truncated_message_is_rejected() {
        let buf = serialize(&player(), HeaderMode::Explicit).unwrap();
        let mut target = Player::default();
        assert!(matches!(
            deserialize(&buf[..buf.len() - 1], &mut target),
            Err(FrameError::Truncated {
                declared: 23,
                actual: 22
            })
        ));
        assert!(matches!(
            deserialize(&buf[..4], &mut target),
            Err(FrameError::HeaderTooShort { len: 4 })
        ));
    }

    #[test]
    fn unknown_field_index_fails_without_mutation() {
        let buf = serialize(&player(), HeaderMode::Explicit).unwrap();
        let mut patched = buf.to_vec();
        patched[9..11].copy_from_slice(&9u16.to_le_bytes()); // field 0 -> index 9

        let mut target = Player {
            id: -5,
            name: "untouched".into(),
        };
        assert!(matches!(
            deserialize(&patched, &mut target),
            Err(FrameError::UnknownFieldIndex { index: 9 })
        ));
        assert_eq!(target.id, -5);
        assert_eq!(target.name, "untouched");
    }

    #[test]
    fn entity_mismatch_is_detected() {
        #[derive(Default)]
        struct Enemy {
            id: i32,
        }
        impl Record for Enemy {
            const ENTITY_INDEX: u16 = 8;
            fn fields() -> Vec<FieldDef<Self>> {
                vec![FieldDef::scalar("id", 0, |e: &Enemy| e.id, |e, v| e.id = v)]
            }
        }

        let buf = serialize(&player(), HeaderMode::Explicit).unwrap();
        let mut target = Enemy::default();
        assert!(matches!(
            deserialize(&buf, &mut target),
            Err(FrameError::EntityMismatch {
                expected: 8,
                found: 7
            })
        ));
    }

    #[test]
    fn negative_variable_size_is_rejected() {
        let buf = serialize(&player(), HeaderMode::Explicit).unwrap();
        let mut patched = buf.to_vec();
        patched[13..17].copy_from_slice(&(-1i32).to_le_bytes());

        let mut target = Player::default();
        assert!(matches!(
            deserialize(&patched, &mut target),
            Err(FrameError::InvalidFieldSize { index: 1, size: -1 })
        ));
    }

    #[test]
    fn trailing_bytes_belong_to_the_next_message() {
        let first = serialize(&player(), HeaderMode::Explicit).unwrap();
        let second = serialize(
            &Player {
                id: 1,
                name: "next".into(),
            },
            HeaderMode::Explicit,
        )
        .unwrap();

        let mut stream = first.to_vec();
        stream.extend_from_slice(&second);

        let mut a = Player::default();
        let consumed = deserialize(&stream, &mut a).unwrap();
        assert_eq!(a, player());

        let mut b = Player::default();
        deserialize(&stream[consumed..], &mut b).unwrap();
        assert_eq!(b.name, "next");
    }

    #[test]
    fn leased_serialization_produces_identical_bytes() {
        let pool = BufferPool::new();
        let fresh = serialize(&player(), HeaderMode::Explicit).unwrap();
        let lease = serialize_into_lease(&player(), HeaderMode::Explicit, &pool).unwrap();
        assert_eq!(lease.as_slice(), fresh.as_ref());

        lease.release();
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn fixed_only_record_round_trips_in_both_modes() {
        #[derive(Debug, Default, PartialEq)]
        struct Point {
            x: f64,
            y: f64,
        }
        impl Record for Point {
            const ENTITY_INDEX: u16 = 21;
            fn fields() -> Vec<FieldDef<Self>> {
                vec![
                    FieldDef::scalar("x", 0, |p: &Point| p.x, |p, v| p.x = v),
                    FieldDef::scalar("y", 1, |p: &Point| p.y, |p, v| p.y = v),
                ]
            }
        }

        let point = Point { x: 1.5, y: -2.25 };

        let explicit = serialize(&point, HeaderMode::Explicit).unwrap();
        assert_eq!(explicit.len(), 9 + 2 * 2 + 16);
        let mut decoded = Point::default();
        deserialize(&explicit, &mut decoded).unwrap();
        assert_eq!(decoded, point);

        // Implicit mode of a fixed-only record is just the fixed block.
        let implicit = serialize(&point, HeaderMode::Implicit).unwrap();
        assert_eq!(implicit.len(), 9 + 16);
    }

    #[test]
    fn empty_variable_fields_occupy_zero_data_bytes() {
        let record = Player {
            id: 0,
            name: String::new(),
        };
        let buf = serialize(&record, HeaderMode::Explicit).unwrap();
        assert_eq!(buf.len(), 9 + 2 + 2 + 4 + 4); // header + id only
        assert_eq!(&buf[13..17], &[0, 0, 0, 0]); // recorded size 0

        let mut decoded = Player {
            id: 9,
            name: "seed".into(),
        };
        deserialize(&buf, &mut decoded).unwrap();
        assert_eq!(decoded, record);
    }
}
