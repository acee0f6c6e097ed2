//! Message framing for fieldwire records.
//!
//! The framer turns a record into one self-contained message — header plus
//! data region — via the type's cached schema, and parses explicit-header
//! messages back into an existing record. The first four bytes of every
//! message are its own total length, so a transport can split a byte
//! stream into messages without understanding field semantics.
//!
//! See [`layout`] for the exact wire layout.

pub mod error;
pub mod framer;

pub use error::{FrameError, Result};
pub use fieldwire_schema::layout;
pub use framer::{deserialize, serialize, serialize_into_lease, serialized_size, HeaderMode};
