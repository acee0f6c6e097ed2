/// Errors that can occur during primitive encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The offset points past the end of the buffer.
    #[error("offset {offset} out of range for buffer of {len} bytes")]
    OffsetOutOfRange { offset: usize, len: usize },

    /// The buffer has too few bytes left at the offset for the operation.
    #[error("insufficient capacity ({needed} bytes needed, {available} available)")]
    InsufficientCapacity { needed: usize, available: usize },

    /// An encoded array's byte length is not a multiple of the element width.
    #[error("byte length {len} is not a multiple of element width {width}")]
    LengthNotDivisible { len: usize, width: usize },

    /// The character does not fit in a single UTF-16 code unit.
    #[error("char {0:?} is outside the Basic Multilingual Plane")]
    CharOutsideBmp(char),

    /// The decoded 16-bit value is a surrogate and not a valid char.
    #[error("code unit {0:#06x} is not a valid char")]
    InvalidCharUnit(u16),

    /// The decimal flags word has a bad scale or nonzero reserved bits.
    #[error("invalid decimal flags word {0:#010x}")]
    InvalidDecimal(u32),

    /// The decimal mantissa does not fit in 96 bits.
    #[error("decimal mantissa {0} does not fit in 96 bits")]
    DecimalOverflow(i128),

    /// The time value does not fit in a signed 64-bit tick count.
    #[error("time value out of tick range")]
    TicksOutOfRange,

    /// The decoded bytes are not valid UTF-8.
    #[error("invalid UTF-8 text: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The decoded code units are not valid UTF-16.
    #[error("invalid UTF-16 text")]
    InvalidUtf16,
}

pub type Result<T> = std::result::Result<T, CodecError>;
