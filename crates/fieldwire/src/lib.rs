//! Binary object codec: index-tagged records to compact byte buffers.
//!
//! fieldwire serializes typed records straight to a byte buffer — no
//! intermediate object graph — using a self-describing wire format built
//! on a fixed little-endian primitive codec.
//!
//! # Crate Structure
//!
//! - [`codec`] — Primitive scalar/array/text encoding and the buffer-lease pool
//! - [`schema`] — Field descriptors, one-time schema compilation, process-wide cache
//! - [`frame`] — Message framing: header construction, serialize/deserialize
//!
//! # Quickstart
//!
//! ```
//! use fieldwire::frame::{deserialize, serialize, HeaderMode};
//! use fieldwire::schema::{FieldDef, Record};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Player {
//!     id: i32,
//!     name: String,
//! }
//!
//! impl Record for Player {
//!     const ENTITY_INDEX: u16 = 7;
//!
//!     fn fields() -> Vec<FieldDef<Self>> {
//!         vec![
//!             FieldDef::scalar("id", 0, |p: &Player| p.id, |p, v| p.id = v),
//!             FieldDef::utf8("name", 1, |p: &Player| p.name.as_str(), |p, v| p.name = v),
//!         ]
//!     }
//! }
//!
//! let original = Player { id: 42, name: "ab".into() };
//! let wire = serialize(&original, HeaderMode::Explicit)?;
//!
//! let mut decoded = Player::default();
//! deserialize(&wire, &mut decoded)?;
//! assert_eq!(decoded, original);
//! # Ok::<(), fieldwire::frame::FrameError>(())
//! ```

/// Re-export primitive codec types.
pub mod codec {
    pub use fieldwire_codec::*;
}

/// Re-export schema types.
pub mod schema {
    pub use fieldwire_schema::*;
}

/// Re-export framing types.
pub mod frame {
    pub use fieldwire_frame::*;
}
