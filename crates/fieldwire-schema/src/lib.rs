//! Record schemas: field descriptors, one-time compilation, and a
//! process-wide cache.
//!
//! A type declares its serializable members once by implementing
//! [`Record`]; on first use [`schema_of`] compiles the declarations into an
//! immutable [`Schema`] — fields sorted by declared index, accessor
//! closures bound to the primitive codec, fixed sizes and header byte
//! layouts precomputed — and caches it for the process lifetime.

pub mod compile;
pub mod error;
pub mod field;
pub mod layout;
pub mod record;
pub mod registry;

pub use compile::{HeaderTemplate, Schema, SizeSlot};
pub use error::{Result, SchemaError};
pub use field::{FieldDef, FieldKind};
pub use record::Record;
pub use registry::schema_of;
