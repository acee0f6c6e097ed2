use crate::bounds;
use crate::error::{CodecError, Result};
use crate::scalar::FixedWidth;

const MANTISSA_BITS: u32 = 96;
const MAX_MANTISSA: i128 = (1i128 << MANTISSA_BITS) - 1;

/// Highest supported scale (number of decimal digits after the point).
pub const MAX_SCALE: u8 = 28;

const SCALE_SHIFT: u32 = 16;
const SCALE_MASK: u32 = 0xFF << SCALE_SHIFT;
const SIGN_BIT: u32 = 1 << 31;

/// A 128-bit decimal wire value.
///
/// Canonical 16-byte encoding: the 96-bit unsigned mantissa as three
/// little-endian `u32` words (low, mid, high) followed by a `u32` flags
/// word holding the scale in bits 16..=23 (at most [`MAX_SCALE`]) and the
/// sign in bit 31. All other flag bits must be zero; decoding rejects a
/// flags word that violates this.
///
/// The represented value is `mantissa / 10^scale`, negated when the sign
/// bit is set. This is a wire type, not an arithmetic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    lo: u32,
    mid: u32,
    hi: u32,
    flags: u32,
}

impl Decimal {
    /// Build a decimal from a signed mantissa and a scale.
    ///
    /// Fails if `|mantissa|` exceeds 96 bits or `scale` exceeds
    /// [`MAX_SCALE`].
    pub fn new(mantissa: i128, scale: u8) -> Result<Self> {
        if scale > MAX_SCALE {
            return Err(CodecError::InvalidDecimal(
                u32::from(scale) << SCALE_SHIFT,
            ));
        }
        let negative = mantissa < 0;
        let magnitude = mantissa.unsigned_abs();
        if magnitude > MAX_MANTISSA as u128 {
            return Err(CodecError::DecimalOverflow(mantissa));
        }
        let mut flags = u32::from(scale) << SCALE_SHIFT;
        if negative {
            flags |= SIGN_BIT;
        }
        Ok(Self {
            lo: magnitude as u32,
            mid: (magnitude >> 32) as u32,
            hi: (magnitude >> 64) as u32,
            flags,
        })
    }

    /// Signed mantissa.
    pub fn mantissa(&self) -> i128 {
        let magnitude =
            u128::from(self.lo) | (u128::from(self.mid) << 32) | (u128::from(self.hi) << 64);
        let magnitude = magnitude as i128;
        if self.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Number of decimal digits after the point.
    pub fn scale(&self) -> u8 {
        ((self.flags & SCALE_MASK) >> SCALE_SHIFT) as u8
    }

    /// Whether the sign bit is set.
    pub fn is_negative(&self) -> bool {
        self.flags & SIGN_BIT != 0
    }

    fn validate_flags(flags: u32) -> Result<u32> {
        let reserved = flags & !(SCALE_MASK | SIGN_BIT);
        let scale = (flags & SCALE_MASK) >> SCALE_SHIFT;
        if reserved != 0 || scale > u32::from(MAX_SCALE) {
            return Err(CodecError::InvalidDecimal(flags));
        }
        Ok(flags)
    }
}

impl FixedWidth for Decimal {
    const WIDTH: usize = 16;

    fn put(self, dst: &mut [u8], offset: usize) -> Result<usize> {
        bounds::check(dst, offset, Self::WIDTH)?;
        dst[offset..offset + 4].copy_from_slice(&self.lo.to_le_bytes());
        dst[offset + 4..offset + 8].copy_from_slice(&self.mid.to_le_bytes());
        dst[offset + 8..offset + 12].copy_from_slice(&self.hi.to_le_bytes());
        dst[offset + 12..offset + 16].copy_from_slice(&self.flags.to_le_bytes());
        Ok(Self::WIDTH)
    }

    fn take(src: &[u8], offset: usize) -> Result<Self> {
        bounds::check(src, offset, Self::WIDTH)?;
        let word = |at: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&src[offset + at..offset + at + 4]);
            u32::from_le_bytes(raw)
        };
        let flags = Self::validate_flags(word(12))?;
        Ok(Self {
            lo: word(0),
            mid: word(4),
            hi: word(8),
            flags,
        })
    }
}
