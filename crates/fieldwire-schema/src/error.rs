/// Errors that can occur while compiling a record schema.
///
/// These are configuration errors: compilation is a deterministic function
/// of the type's field declarations, so a type that fails to compile fails
/// identically on every attempt.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The type declares no serializable fields.
    #[error("type {type_name} declares no serializable fields")]
    NoFields { type_name: &'static str },

    /// Two fields declare the same index.
    #[error("type {type_name} declares field index {index} more than once")]
    DuplicateIndex { type_name: &'static str, index: u16 },

    /// The field count does not fit the wire header's 16-bit counter.
    #[error("type {type_name} declares {count} fields (max 65535)")]
    TooManyFields { type_name: &'static str, count: usize },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
