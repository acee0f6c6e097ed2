//! UTF-8 and UTF-16 text encoding.
//!
//! Text is variable-width on the wire: the encoded byte count is computed
//! from the content (never chars × width), and the decoder is told how many
//! bytes to consume.

use crate::bounds;
use crate::error::{CodecError, Result};

/// Encoded UTF-8 byte count of `text`.
pub fn utf8_size(text: &str) -> usize {
    text.len()
}

/// Encode `text` as UTF-8 into `dst` at `offset`, returning bytes written.
pub fn write_utf8(text: &str, dst: &mut [u8], offset: usize) -> Result<usize> {
    let raw = text.as_bytes();
    bounds::check(dst, offset, raw.len())?;
    dst[offset..offset + raw.len()].copy_from_slice(raw);
    Ok(raw.len())
}

/// Decode `len` bytes of UTF-8 text from `src` at `offset`.
pub fn read_utf8(src: &[u8], offset: usize, len: usize) -> Result<String> {
    bounds::check(src, offset, len)?;
    Ok(String::from_utf8(src[offset..offset + len].to_vec())?)
}

/// Encoded UTF-16 byte count of `text` (two bytes per code unit).
pub fn utf16_size(text: &str) -> usize {
    text.encode_utf16().count() * 2
}

/// Encode `text` as little-endian UTF-16 code units into `dst` at `offset`.
pub fn write_utf16(text: &str, dst: &mut [u8], offset: usize) -> Result<usize> {
    let needed = utf16_size(text);
    bounds::check(dst, offset, needed)?;
    let mut at = offset;
    for unit in text.encode_utf16() {
        dst[at..at + 2].copy_from_slice(&unit.to_le_bytes());
        at += 2;
    }
    Ok(needed)
}

/// Decode `len` bytes of little-endian UTF-16 text from `src` at `offset`.
///
/// `len` must be even; unpaired surrogates fail with `InvalidUtf16`.
pub fn read_utf16(src: &[u8], offset: usize, len: usize) -> Result<String> {
    if len % 2 != 0 {
        return Err(CodecError::LengthNotDivisible { len, width: 2 });
    }
    bounds::check(src, offset, len)?;
    let units: Vec<u16> = src[offset..offset + len]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| CodecError::InvalidUtf16)
}

/// Encoded size of optional text; `None` occupies zero bytes.
///
/// On the wire `None` is indistinguishable from `""` — a documented
/// limitation of the format, not corrected here.
pub fn opt_utf8_size(text: Option<&str>) -> usize {
    text.map_or(0, utf8_size)
}

/// Encode optional text; `None` writes nothing and returns 0.
pub fn write_opt_utf8(text: Option<&str>, dst: &mut [u8], offset: usize) -> Result<usize> {
    match text {
        Some(text) => write_utf8(text, dst, offset),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_round_trips() {
        let mut buf = [0u8; 32];
        for text in ["", "ab", "héllo", "日本語", "🦀"] {
            let n = write_utf8(text, &mut buf, 3).unwrap();
            assert_eq!(n, utf8_size(text));
            assert_eq!(read_utf8(&buf, 3, n).unwrap(), text);
        }
    }

    #[test]
    fn utf8_size_is_byte_count_not_char_count() {
        assert_eq!(utf8_size("héllo"), 6);
        assert_eq!(utf8_size("🦀"), 4);
    }

    #[test]
    fn invalid_utf8_fails_to_decode() {
        let buf = [0xFF, 0xFE, 0xFD];
        assert!(matches!(
            read_utf8(&buf, 0, 3),
            Err(CodecError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn utf16_round_trips_including_astral_plane() {
        let mut buf = [0u8; 32];
        for text in ["", "ab", "日本語", "🦀"] {
            let n = write_utf16(text, &mut buf, 1).unwrap();
            assert_eq!(n, utf16_size(text));
            assert_eq!(read_utf16(&buf, 1, n).unwrap(), text);
        }
    }

    #[test]
    fn utf16_code_units_are_little_endian() {
        let mut buf = [0u8; 4];
        write_utf16("AB", &mut buf, 0).unwrap();
        assert_eq!(buf, [0x41, 0x00, 0x42, 0x00]);
    }

    #[test]
    fn utf16_odd_length_is_divisibility_error() {
        let buf = [0u8; 4];
        assert!(matches!(
            read_utf16(&buf, 0, 3),
            Err(CodecError::LengthNotDivisible { len: 3, width: 2 })
        ));
    }

    #[test]
    fn utf16_unpaired_surrogate_fails() {
        let buf = 0xD800u16.to_le_bytes();
        assert!(matches!(
            read_utf16(&buf, 0, 2),
            Err(CodecError::InvalidUtf16)
        ));
    }

    #[test]
    fn absent_text_writes_zero_bytes() {
        let mut buf = [0xAAu8; 4];
        assert_eq!(opt_utf8_size(None), 0);
        assert_eq!(write_opt_utf8(None, &mut buf, 0).unwrap(), 0);
        assert_eq!(buf, [0xAA; 4]);
        // Indistinguishable from the empty string.
        assert_eq!(write_opt_utf8(Some(""), &mut buf, 0).unwrap(), 0);
    }

    #[test]
    fn capacity_checked_before_writing() {
        let mut buf = [0u8; 2];
        assert!(matches!(
            write_utf8("abc", &mut buf, 0),
            Err(CodecError::InsufficientCapacity { .. })
        ));
        assert_eq!(buf, [0; 2]);
    }
}
