//! Wire header layout.
//!
//! Every message starts with a fixed 9-byte block (all integers
//! little-endian, offsets from message start):
//!
//! ```text
//! offset 0:  i32  totalMessageSize   (includes the header itself)
//! offset 4:  u8   headerFlag         (1 = explicit, 0 = implicit)
//! offset 5:  u16  entityIndex
//! offset 7:  u16  fieldCount
//! ```
//!
//! In explicit mode the block is followed, per field in schema order, by a
//! `u16` field index and — only for variable-length fields — an `i32` byte
//! size immediately after the index. In implicit mode the per-field index
//! entries are omitted and only the variable sizes appear, in schema order.
//! The data region follows the header, fields packed in the order the
//! header declares.

/// Offset of the `i32` total message size.
pub const TOTAL_SIZE_OFFSET: usize = 0;

/// Offset of the explicit/implicit flag byte.
pub const HEADER_FLAG_OFFSET: usize = 4;

/// Offset of the `u16` entity index.
pub const ENTITY_INDEX_OFFSET: usize = 5;

/// Offset of the `u16` field count.
pub const FIELD_COUNT_OFFSET: usize = 7;

/// Size of the leading fixed header block.
pub const FIXED_HEADER_SIZE: usize = 9;

/// Size of one per-field index entry (explicit mode).
pub const FIELD_INDEX_SIZE: usize = 2;

/// Size of one variable-field byte-size slot.
pub const FIELD_SIZE_SLOT: usize = 4;

/// Flag byte for an explicit header.
pub const FLAG_EXPLICIT: u8 = 1;

/// Flag byte for an implicit header.
pub const FLAG_IMPLICIT: u8 = 0;
