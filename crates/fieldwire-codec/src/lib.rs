//! Little-endian primitive codec and buffer-lease pool.
//!
//! Every supported primitive converts to and from bytes at an arbitrary
//! offset in a caller-owned buffer. The wire byte order is **fixed
//! little-endian** on every platform — nothing here depends on host order.
//!
//! Scalars implement [`FixedWidth`] and occupy a constant number of bytes;
//! text and arrays are variable-width, with the byte count computed from
//! the content. Every operation validates bounds before touching memory
//! and fails without a partial write.
//!
//! The [`pool`] module provides pooled output storage for callers that
//! want to avoid per-call allocation.

mod bounds;

pub mod array;
pub mod decimal;
pub mod error;
pub mod pool;
pub mod scalar;
pub mod text;
pub mod time;

pub use array::{
    read_bytes, read_bytes_leased, read_slice_into, read_vec, slice_size, write_bytes, write_slice,
};
pub use decimal::{Decimal, MAX_SCALE};
pub use error::{CodecError, Result};
pub use pool::{BufferLease, BufferPool, DEFAULT_MAX_RETAINED};
pub use scalar::{read, width_of, write, FixedWidth};
pub use text::{
    opt_utf8_size, read_utf16, read_utf8, utf16_size, utf8_size, write_opt_utf8, write_utf16,
    write_utf8,
};
pub use time::{TimeSpan, Timestamp, TICKS_PER_SECOND};
