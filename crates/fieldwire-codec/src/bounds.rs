use crate::error::{CodecError, Result};

/// Validate that `buf` can hold `needed` bytes starting at `offset`.
///
/// Checked before any byte is touched so a failed operation never
/// partially writes or reads.
pub(crate) fn check(buf: &[u8], offset: usize, needed: usize) -> Result<()> {
    if offset > buf.len() {
        return Err(CodecError::OffsetOutOfRange {
            offset,
            len: buf.len(),
        });
    }
    let available = buf.len() - offset;
    if available < needed {
        return Err(CodecError::InsufficientCapacity { needed, available });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_past_end_is_distinct_from_capacity() {
        let buf = [0u8; 4];
        assert!(matches!(
            check(&buf, 5, 1),
            Err(CodecError::OffsetOutOfRange { offset: 5, len: 4 })
        ));
        assert!(matches!(
            check(&buf, 2, 4),
            Err(CodecError::InsufficientCapacity {
                needed: 4,
                available: 2
            })
        ));
    }

    #[test]
    fn exact_fit_passes() {
        let buf = [0u8; 4];
        assert!(check(&buf, 0, 4).is_ok());
        assert!(check(&buf, 4, 0).is_ok());
    }
}
