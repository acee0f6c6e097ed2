use std::collections::HashMap;

use bytes::BufMut;

use crate::error::{Result, SchemaError};
use crate::field::FieldDef;
use crate::layout::{
    FIELD_INDEX_SIZE, FIELD_SIZE_SLOT, FIXED_HEADER_SIZE, FLAG_EXPLICIT, FLAG_IMPLICIT,
};
use crate::record::Record;

/// A zeroed header slot that is rewritten per message.
#[derive(Debug, Clone, Copy)]
pub struct SizeSlot {
    /// Position of the variable field in the schema's sorted field list.
    pub field_pos: usize,
    /// Byte offset of the field's `i32` size slot within the header.
    pub offset: usize,
}

/// A precomputed header byte layout for one record type.
///
/// The flag, entity index, field count and (in explicit mode) field index
/// entries never change, so they are filled in at compile time. The total
/// size slot at offset 0 and the variable-field size slots are left zeroed
/// and backfilled per message.
#[derive(Debug)]
pub struct HeaderTemplate {
    bytes: Vec<u8>,
    size_slots: Vec<SizeSlot>,
}

impl HeaderTemplate {
    /// Header length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the template is empty (never true for a compiled schema).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The template bytes, with per-message slots zeroed.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size slots to backfill, one per variable field in schema order.
    pub fn size_slots(&self) -> &[SizeSlot] {
        &self.size_slots
    }
}

/// The compiled, immutable schema of one record type.
///
/// Created at most once per type (see [`schema_of`](crate::schema_of)),
/// then shared for the process lifetime. Safe to use from any number of
/// threads concurrently — nothing here mutates after compilation.
pub struct Schema<T> {
    type_name: &'static str,
    entity_index: u16,
    fields: Vec<FieldDef<T>>,
    by_index: HashMap<u16, usize>,
    fixed_data_size: usize,
    variable_count: usize,
    explicit_header: HeaderTemplate,
    implicit_header: HeaderTemplate,
}

impl<T: Record> Schema<T> {
    /// Compile the schema from the type's field declarations.
    ///
    /// Validates the declarations (at least one field, unique indices,
    /// count within the header's 16-bit range), sorts fields ascending by
    /// declared index — the canonical on-wire order — and precomputes the
    /// fixed-data size plus both header templates.
    pub fn compile() -> Result<Self> {
        let type_name = std::any::type_name::<T>();
        let mut fields = T::fields();

        if fields.is_empty() {
            return Err(SchemaError::NoFields { type_name });
        }
        if fields.len() > usize::from(u16::MAX) {
            return Err(SchemaError::TooManyFields {
                type_name,
                count: fields.len(),
            });
        }

        fields.sort_by_key(FieldDef::index);

        let mut by_index = HashMap::with_capacity(fields.len());
        for (pos, field) in fields.iter().enumerate() {
            if by_index.insert(field.index(), pos).is_some() {
                return Err(SchemaError::DuplicateIndex {
                    type_name,
                    index: field.index(),
                });
            }
        }

        let fixed_data_size = fields.iter().map(FieldDef::fixed_width).sum();
        let variable_count = fields.iter().filter(|f| f.is_variable()).count();
        let explicit_header = build_template(&fields, T::ENTITY_INDEX, true);
        let implicit_header = build_template(&fields, T::ENTITY_INDEX, false);

        Ok(Self {
            type_name,
            entity_index: T::ENTITY_INDEX,
            fields,
            by_index,
            fixed_data_size,
            variable_count,
            explicit_header,
            implicit_header,
        })
    }
}

impl<T> Schema<T> {
    /// Name of the record type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The type's caller-assigned entity index.
    pub fn entity_index(&self) -> u16 {
        self.entity_index
    }

    /// Fields in canonical wire order (ascending by declared index).
    pub fn fields(&self) -> &[FieldDef<T>] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Look up a field by its declared index.
    pub fn field_by_index(&self, index: u16) -> Option<&FieldDef<T>> {
        self.by_index.get(&index).map(|&pos| &self.fields[pos])
    }

    /// Combined width of all fixed fields.
    pub fn fixed_data_size(&self) -> usize {
        self.fixed_data_size
    }

    /// Number of variable-length fields.
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Whether any field is variable-length.
    pub fn has_variable(&self) -> bool {
        self.variable_count > 0
    }

    /// The precomputed self-describing header.
    pub fn explicit_header(&self) -> &HeaderTemplate {
        &self.explicit_header
    }

    /// The precomputed positional header.
    pub fn implicit_header(&self) -> &HeaderTemplate {
        &self.implicit_header
    }
}

impl<T> std::fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("entity_index", &self.entity_index)
            .field("field_count", &self.fields.len())
            .field("fixed_data_size", &self.fixed_data_size)
            .field("variable_count", &self.variable_count)
            .finish()
    }
}

fn build_template<T>(fields: &[FieldDef<T>], entity_index: u16, explicit: bool) -> HeaderTemplate {
    let per_field = if explicit { FIELD_INDEX_SIZE } else { 0 };
    let variable_count = fields.iter().filter(|f| f.is_variable()).count();
    let len = FIXED_HEADER_SIZE + per_field * fields.len() + FIELD_SIZE_SLOT * variable_count;

    let mut bytes = Vec::with_capacity(len);
    let mut size_slots = Vec::with_capacity(variable_count);

    bytes.put_i32_le(0); // total size, backfilled per message
    bytes.put_u8(if explicit { FLAG_EXPLICIT } else { FLAG_IMPLICIT });
    bytes.put_u16_le(entity_index);
    bytes.put_u16_le(fields.len() as u16);

    for (pos, field) in fields.iter().enumerate() {
        if explicit {
            bytes.put_u16_le(field.index());
        }
        if field.is_variable() {
            size_slots.push(SizeSlot {
                field_pos: pos,
                offset: bytes.len(),
            });
            bytes.put_i32_le(0); // byte size, backfilled per message
        }
    }

    debug_assert_eq!(bytes.len(), len);
    HeaderTemplate { bytes, size_slots }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ENTITY_INDEX_OFFSET, FIELD_COUNT_OFFSET, HEADER_FLAG_OFFSET};

    #[derive(Default)]
    struct Sample {
        id: i32,
        flag: bool,
        name: String,
        data: Vec<u8>,
    }

    impl Record for Sample {
        const ENTITY_INDEX: u16 = 3;

        fn fields() -> Vec<FieldDef<Self>> {
            // Deliberately declared out of index order.
            vec![
                FieldDef::utf8("name", 2, |s: &Sample| s.name.as_str(), |s, v| s.name = v),
                FieldDef::scalar("id", 0, |s: &Sample| s.id, |s, v| s.id = v),
                FieldDef::bytes("data", 5, |s: &Sample| s.data.as_slice(), |s, v| s.data = v),
                FieldDef::scalar("flag", 1, |s: &Sample| s.flag, |s, v| s.flag = v),
            ]
        }
    }

    #[test]
    fn fields_sorted_ascending_by_index() {
        let schema = Schema::<Sample>::compile().unwrap();
        let indices: Vec<u16> = schema.fields().iter().map(FieldDef::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 5]);
    }

    #[test]
    fn precomputed_sizes() {
        let schema = Schema::<Sample>::compile().unwrap();
        assert_eq!(schema.fixed_data_size(), 5); // i32 + bool
        assert_eq!(schema.variable_count(), 2);
        assert!(schema.has_variable());
        assert_eq!(schema.field_count(), 4);
    }

    #[test]
    fn index_lookup() {
        let schema = Schema::<Sample>::compile().unwrap();
        assert_eq!(schema.field_by_index(5).unwrap().name(), "data");
        assert!(schema.field_by_index(3).is_none());
    }

    #[test]
    fn explicit_template_layout() {
        let schema = Schema::<Sample>::compile().unwrap();
        let header = schema.explicit_header();

        // 9 fixed + 4 index entries + 2 size slots
        assert_eq!(header.len(), 9 + 4 * 2 + 2 * 4);

        let bytes = header.bytes();
        assert_eq!(&bytes[0..4], &[0, 0, 0, 0]); // total size zeroed
        assert_eq!(bytes[HEADER_FLAG_OFFSET], FLAG_EXPLICIT);
        assert_eq!(&bytes[ENTITY_INDEX_OFFSET..ENTITY_INDEX_OFFSET + 2], &[3, 0]);
        assert_eq!(&bytes[FIELD_COUNT_OFFSET..FIELD_COUNT_OFFSET + 2], &[4, 0]);

        // Entries interleaved: idx 0, idx 1, idx 2 + size slot, idx 5 + size slot.
        assert_eq!(&bytes[9..11], &[0, 0]);
        assert_eq!(&bytes[11..13], &[1, 0]);
        assert_eq!(&bytes[13..15], &[2, 0]);
        assert_eq!(&bytes[15..19], &[0, 0, 0, 0]);
        assert_eq!(&bytes[19..21], &[5, 0]);
        assert_eq!(&bytes[21..25], &[0, 0, 0, 0]);

        let slots = header.size_slots();
        assert_eq!(slots.len(), 2);
        assert_eq!((slots[0].field_pos, slots[0].offset), (2, 15));
        assert_eq!((slots[1].field_pos, slots[1].offset), (3, 21));
    }

    #[test]
    fn implicit_template_omits_index_entries() {
        let schema = Schema::<Sample>::compile().unwrap();
        let header = schema.implicit_header();

        assert_eq!(header.len(), 9 + 2 * 4);
        assert_eq!(header.bytes()[HEADER_FLAG_OFFSET], FLAG_IMPLICIT);

        let slots = header.size_slots();
        assert_eq!((slots[0].field_pos, slots[0].offset), (2, 9));
        assert_eq!((slots[1].field_pos, slots[1].offset), (3, 13));
    }

    #[test]
    fn duplicate_index_fails_compile() {
        struct Clash;
        impl Record for Clash {
            const ENTITY_INDEX: u16 = 0;
            fn fields() -> Vec<FieldDef<Self>> {
                vec![
                    FieldDef::scalar("a", 1, |_: &Clash| 0u8, |_, _| {}),
                    FieldDef::scalar("b", 1, |_: &Clash| 0u8, |_, _| {}),
                ]
            }
        }

        // Fails identically on every attempt.
        for _ in 0..2 {
            assert!(matches!(
                Schema::<Clash>::compile(),
                Err(SchemaError::DuplicateIndex { index: 1, .. })
            ));
        }
    }

    #[test]
    fn untagged_type_fails_compile() {
        struct Bare;
        impl Record for Bare {
            const ENTITY_INDEX: u16 = 0;
            fn fields() -> Vec<FieldDef<Self>> {
                Vec::new()
            }
        }

        assert!(matches!(
            Schema::<Bare>::compile(),
            Err(SchemaError::NoFields { .. })
        ));
    }

    #[test]
    fn fixed_only_schema_has_no_size_slots() {
        struct Point;
        impl Record for Point {
            const ENTITY_INDEX: u16 = 9;
            fn fields() -> Vec<FieldDef<Self>> {
                vec![
                    FieldDef::scalar("x", 0, |_: &Point| 1.0f64, |_, _| {}),
                    FieldDef::scalar("y", 1, |_: &Point| 2.0f64, |_, _| {}),
                ]
            }
        }

        let schema = Schema::<Point>::compile().unwrap();
        assert!(!schema.has_variable());
        assert!(schema.explicit_header().size_slots().is_empty());
        assert_eq!(schema.explicit_header().len(), 9 + 2 * 2);
        assert_eq!(schema.implicit_header().len(), 9);
    }
}
