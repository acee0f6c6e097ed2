use crate::bounds;
use crate::error::{CodecError, Result};

/// A scalar with a fixed encoded width, written little-endian.
///
/// `put` and `take` validate bounds before touching memory; a failed
/// call leaves the buffer untouched.
pub trait FixedWidth: Sized + Copy {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Encode `self` into `dst` at `offset`. Returns [`Self::WIDTH`].
    fn put(self, dst: &mut [u8], offset: usize) -> Result<usize>;

    /// Decode a value from `src` at `offset`.
    fn take(src: &[u8], offset: usize) -> Result<Self>;
}

/// Encode a scalar into `dst` at `offset`, returning bytes written.
pub fn write<T: FixedWidth>(value: T, dst: &mut [u8], offset: usize) -> Result<usize> {
    value.put(dst, offset)
}

/// Decode a scalar from `src` at `offset`.
pub fn read<T: FixedWidth>(src: &[u8], offset: usize) -> Result<T> {
    T::take(src, offset)
}

/// Encoded width of a scalar type in bytes.
pub const fn width_of<T: FixedWidth>() -> usize {
    T::WIDTH
}

macro_rules! impl_fixed_width_le {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn put(self, dst: &mut [u8], offset: usize) -> Result<usize> {
                    bounds::check(dst, offset, Self::WIDTH)?;
                    dst[offset..offset + Self::WIDTH].copy_from_slice(&self.to_le_bytes());
                    Ok(Self::WIDTH)
                }

                fn take(src: &[u8], offset: usize) -> Result<Self> {
                    bounds::check(src, offset, Self::WIDTH)?;
                    let mut raw = [0u8; Self::WIDTH];
                    raw.copy_from_slice(&src[offset..offset + Self::WIDTH]);
                    Ok(<$ty>::from_le_bytes(raw))
                }
            }
        )*
    };
}

impl_fixed_width_le!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl FixedWidth for bool {
    const WIDTH: usize = 1;

    /// Always emits exactly `1` or `0`.
    fn put(self, dst: &mut [u8], offset: usize) -> Result<usize> {
        bounds::check(dst, offset, 1)?;
        dst[offset] = u8::from(self);
        Ok(1)
    }

    /// Decode rule: any byte other than `0` is true.
    fn take(src: &[u8], offset: usize) -> Result<Self> {
        bounds::check(src, offset, 1)?;
        Ok(src[offset] != 0)
    }
}

impl FixedWidth for char {
    /// One UTF-16 code unit. Chars outside the BMP do not fit and fail
    /// to encode.
    const WIDTH: usize = 2;

    fn put(self, dst: &mut [u8], offset: usize) -> Result<usize> {
        let code = u32::from(self);
        if code > u32::from(u16::MAX) {
            return Err(CodecError::CharOutsideBmp(self));
        }
        (code as u16).put(dst, offset)
    }

    fn take(src: &[u8], offset: usize) -> Result<Self> {
        let unit = u16::take(src, offset)?;
        char::from_u32(u32::from(unit)).ok_or(CodecError::InvalidCharUnit(unit))
    }
}
