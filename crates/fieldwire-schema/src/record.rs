use crate::field::FieldDef;

/// A type whose fields can be serialized by index.
///
/// Implementing `Record` is the declaration step: `fields()` lists every
/// serializable member once, each with a unique declared index and its
/// accessor pair. The schema compiler consumes this list on the type's
/// first use and caches the result for the process lifetime, so `fields()`
/// runs at most once per type.
///
/// ```
/// use fieldwire_schema::{FieldDef, Record};
///
/// #[derive(Default)]
/// struct Player {
///     id: i32,
///     name: String,
/// }
///
/// impl Record for Player {
///     const ENTITY_INDEX: u16 = 7;
///
///     fn fields() -> Vec<FieldDef<Self>> {
///         vec![
///             FieldDef::scalar("id", 0, |p: &Player| p.id, |p, v| p.id = v),
///             FieldDef::utf8("name", 1, |p: &Player| p.name.as_str(), |p, v| p.name = v),
///         ]
///     }
/// }
/// ```
pub trait Record: Sized + 'static {
    /// Caller-assigned type tag carried in every message header.
    const ENTITY_INDEX: u16;

    /// The serializable members, each tagged with a declared index.
    fn fields() -> Vec<FieldDef<Self>>;
}
