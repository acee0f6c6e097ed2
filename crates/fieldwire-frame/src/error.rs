use fieldwire_codec::CodecError;
use fieldwire_schema::SchemaError;

/// Errors that can occur while framing or parsing messages.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The buffer is too short to hold even the fixed header block.
    #[error("buffer too short for a message header ({len} bytes)")]
    HeaderTooShort { len: usize },

    /// The declared total size cannot describe a valid message.
    #[error("invalid total message size {0}")]
    InvalidTotalSize(i32),

    /// The buffer holds fewer bytes than the header declares.
    #[error("truncated message ({declared} bytes declared, {actual} available)")]
    Truncated { declared: usize, actual: usize },

    /// The message claims an implicit header, which cannot be decoded
    /// without out-of-band schema knowledge.
    #[error("implicit header requires external schema knowledge")]
    ImplicitHeader,

    /// The message's entity index does not match the target type.
    #[error("entity index mismatch (expected {expected}, found {found})")]
    EntityMismatch { expected: u16, found: u16 },

    /// The header names a field index the schema does not declare.
    #[error("unknown field index {index}")]
    UnknownFieldIndex { index: u16 },

    /// A variable field's recorded byte size is negative.
    #[error("invalid byte size {size} for field index {index}")]
    InvalidFieldSize { index: u16, size: i32 },

    /// The message would exceed the 31-bit total-size field.
    #[error("message too large ({size} bytes, max {max})", max = i32::MAX)]
    MessageTooLarge { size: usize },

    /// The target type's schema failed to compile.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A primitive encode/decode failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
