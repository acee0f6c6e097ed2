//! Homogeneous primitive arrays.
//!
//! Arrays encode as a tight contiguous run of each element's fixed
//! little-endian encoding, in index order. Boolean arrays use one byte per
//! element. Byte arrays are an identity copy.

use crate::bounds;
use crate::error::{CodecError, Result};
use crate::pool::{BufferLease, BufferPool};
use crate::scalar::FixedWidth;

/// Encoded byte size of a slice: length × element width.
pub fn slice_size<T: FixedWidth>(values: &[T]) -> usize {
    values.len() * T::WIDTH
}

/// Encode a slice into `dst` at `offset`, returning bytes written.
pub fn write_slice<T: FixedWidth>(values: &[T], dst: &mut [u8], offset: usize) -> Result<usize> {
    let needed = slice_size(values);
    bounds::check(dst, offset, needed)?;
    let mut at = offset;
    for value in values {
        at += value.put(dst, at)?;
    }
    Ok(needed)
}

/// Decode `len` bytes from `src` at `offset` into a fresh vector.
///
/// `len` must be a multiple of the element width.
pub fn read_vec<T: FixedWidth>(src: &[u8], offset: usize, len: usize) -> Result<Vec<T>> {
    if len % T::WIDTH != 0 {
        return Err(CodecError::LengthNotDivisible {
            len,
            width: T::WIDTH,
        });
    }
    bounds::check(src, offset, len)?;
    let mut values = Vec::with_capacity(len / T::WIDTH);
    let mut at = offset;
    while at < offset + len {
        values.push(T::take(src, at)?);
        at += T::WIDTH;
    }
    Ok(values)
}

/// Decode `len` bytes from `src` at `offset` into caller-provided storage.
///
/// The allocation-avoiding counterpart of [`read_vec`]: `out` must hold
/// exactly `len / width` elements.
pub fn read_slice_into<T: FixedWidth>(
    src: &[u8],
    offset: usize,
    len: usize,
    out: &mut [T],
) -> Result<()> {
    if len % T::WIDTH != 0 {
        return Err(CodecError::LengthNotDivisible {
            len,
            width: T::WIDTH,
        });
    }
    let wanted = len / T::WIDTH;
    if out.len() != wanted {
        return Err(CodecError::InsufficientCapacity {
            needed: wanted,
            available: out.len(),
        });
    }
    bounds::check(src, offset, len)?;
    let mut at = offset;
    for slot in out.iter_mut() {
        *slot = T::take(src, at)?;
        at += T::WIDTH;
    }
    Ok(())
}

/// Encode raw bytes into `dst` at `offset` (identity copy).
pub fn write_bytes(values: &[u8], dst: &mut [u8], offset: usize) -> Result<usize> {
    bounds::check(dst, offset, values.len())?;
    dst[offset..offset + values.len()].copy_from_slice(values);
    Ok(values.len())
}

/// Decode `len` raw bytes from `src` at `offset` into a fresh vector.
pub fn read_bytes(src: &[u8], offset: usize, len: usize) -> Result<Vec<u8>> {
    bounds::check(src, offset, len)?;
    Ok(src[offset..offset + len].to_vec())
}

/// Decode `len` raw bytes into a pooled buffer instead of a fresh vector.
///
/// Same bytes as [`read_bytes`]; the lease owns the output storage and
/// returns it to `pool` when dropped or released.
pub fn read_bytes_leased<'p>(
    pool: &'p BufferPool,
    src: &[u8],
    offset: usize,
    len: usize,
) -> Result<BufferLease<'p>> {
    bounds::check(src, offset, len)?;
    let mut lease = pool.rent(len);
    lease.as_mut_slice().copy_from_slice(&src[offset..offset + len]);
    Ok(lease)
}
