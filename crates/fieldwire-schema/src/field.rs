use fieldwire_codec::{self as codec, FixedWidth};

/// Extracts a field's value from a record and encodes it into a buffer at
/// an offset, returning bytes written.
pub type ReadFn<T> = Box<dyn Fn(&T, &mut [u8], usize) -> codec::Result<usize> + Send + Sync>;

/// Decodes a fixed-width field from a buffer at an offset and assigns it
/// onto a record.
pub type WriteFn<T> = Box<dyn Fn(&mut T, &[u8], usize) -> codec::Result<()> + Send + Sync>;

/// Decodes a variable-width field of a known byte length from a buffer at
/// an offset and assigns it onto a record.
pub type WriteVarFn<T> = Box<dyn Fn(&mut T, &[u8], usize, usize) -> codec::Result<()> + Send + Sync>;

/// Queries a field's current encoded byte length.
pub type SizeFn<T> = Box<dyn Fn(&T) -> usize + Send + Sync>;

/// How a field encodes.
pub enum FieldKind<T> {
    /// Constant width, known from the declared type alone.
    Fixed {
        width: usize,
        read: ReadFn<T>,
        write: WriteFn<T>,
    },
    /// Width depends on the current content; queried before writing and
    /// recorded in the header so the decoder knows how much to consume.
    Variable {
        size: SizeFn<T>,
        read: ReadFn<T>,
        write: WriteVarFn<T>,
    },
}

/// One serializable member of a record: a declared index plus the accessor
/// closures bound to the primitive codec.
///
/// Built once per field when the type's schema compiles; immutable and
/// owned by the compiled [`Schema`](crate::Schema) thereafter. Only the
/// constructors below exist, so unsupported member kinds (nested records,
/// exotic collections) cannot be declared at all.
pub struct FieldDef<T> {
    name: &'static str,
    index: u16,
    kind: FieldKind<T>,
}

impl<T> FieldDef<T> {
    /// A fixed-width scalar field.
    pub fn scalar<S>(
        name: &'static str,
        index: u16,
        get: impl Fn(&T) -> S + Send + Sync + 'static,
        set: impl Fn(&mut T, S) + Send + Sync + 'static,
    ) -> Self
    where
        S: FixedWidth + Send + Sync + 'static,
    {
        Self {
            name,
            index,
            kind: FieldKind::Fixed {
                width: S::WIDTH,
                read: Box::new(move |record, dst, offset| get(record).put(dst, offset)),
                write: Box::new(move |record, src, offset| {
                    set(record, S::take(src, offset)?);
                    Ok(())
                }),
            },
        }
    }

    /// A UTF-8 text field.
    pub fn utf8(
        name: &'static str,
        index: u16,
        get: impl for<'a> Fn(&'a T) -> &'a str + Send + Sync + 'static,
        set: impl Fn(&mut T, String) + Send + Sync + 'static,
    ) -> Self {
        let size_get = share(get);
        let read_get = size_get.clone();
        Self {
            name,
            index,
            kind: FieldKind::Variable {
                size: Box::new(move |record| codec::utf8_size((*size_get)(record))),
                read: Box::new(move |record, dst, offset| {
                    codec::write_utf8((*read_get)(record), dst, offset)
                }),
                write: Box::new(move |record, src, offset, len| {
                    set(record, codec::read_utf8(src, offset, len)?);
                    Ok(())
                }),
            },
        }
    }

    /// A UTF-16 text field (little-endian code units on the wire).
    pub fn utf16(
        name: &'static str,
        index: u16,
        get: impl for<'a> Fn(&'a T) -> &'a str + Send + Sync + 'static,
        set: impl Fn(&mut T, String) + Send + Sync + 'static,
    ) -> Self {
        let size_get = share(get);
        let read_get = size_get.clone();
        Self {
            name,
            index,
            kind: FieldKind::Variable {
                size: Box::new(move |record| codec::utf16_size((*size_get)(record))),
                read: Box::new(move |record, dst, offset| {
                    codec::write_utf16((*read_get)(record), dst, offset)
                }),
                write: Box::new(move |record, src, offset, len| {
                    set(record, codec::read_utf16(src, offset, len)?);
                    Ok(())
                }),
            },
        }
    }

    /// A raw byte-array field (identity copy on the wire).
    pub fn bytes(
        name: &'static str,
        index: u16,
        get: impl for<'a> Fn(&'a T) -> &'a [u8] + Send + Sync + 'static,
        set: impl Fn(&mut T, Vec<u8>) + Send + Sync + 'static,
    ) -> Self {
        let size_get = share(get);
        let read_get = size_get.clone();
        Self {
            name,
            index,
            kind: FieldKind::Variable {
                size: Box::new(move |record| (*size_get)(record).len()),
                read: Box::new(move |record, dst, offset| {
                    codec::write_bytes((*read_get)(record), dst, offset)
                }),
                write: Box::new(move |record, src, offset, len| {
                    set(record, codec::read_bytes(src, offset, len)?);
                    Ok(())
                }),
            },
        }
    }

    /// A homogeneous array of fixed-width scalars.
    pub fn array<S>(
        name: &'static str,
        index: u16,
        get: impl for<'a> Fn(&'a T) -> &'a [S] + Send + Sync + 'static,
        set: impl Fn(&mut T, Vec<S>) + Send + Sync + 'static,
    ) -> Self
    where
        S: FixedWidth + Send + Sync + 'static,
    {
        let size_get = share(get);
        let read_get = size_get.clone();
        Self {
            name,
            index,
            kind: FieldKind::Variable {
                size: Box::new(move |record| codec::slice_size((*size_get)(record))),
                read: Box::new(move |record, dst, offset| {
                    codec::write_slice((*read_get)(record), dst, offset)
                }),
                write: Box::new(move |record, src, offset, len| {
                    set(record, codec::read_vec(src, offset, len)?);
                    Ok(())
                }),
            },
        }
    }

    /// Field name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared index; the canonical wire ordering key.
    pub fn index(&self) -> u16 {
        self.index
    }

    /// Whether the encoded width depends on the current content.
    pub fn is_variable(&self) -> bool {
        matches!(self.kind, FieldKind::Variable { .. })
    }

    /// Fixed encoded width; zero for variable fields.
    pub fn fixed_width(&self) -> usize {
        match &self.kind {
            FieldKind::Fixed { width, .. } => *width,
            FieldKind::Variable { .. } => 0,
        }
    }

    /// Current encoded byte length of this field on `record`.
    pub fn wire_size(&self, record: &T) -> usize {
        match &self.kind {
            FieldKind::Fixed { width, .. } => *width,
            FieldKind::Variable { size, .. } => size(record),
        }
    }

    /// Encode this field from `record` into `dst` at `offset`.
    pub fn encode(&self, record: &T, dst: &mut [u8], offset: usize) -> codec::Result<usize> {
        match &self.kind {
            FieldKind::Fixed { read, .. } | FieldKind::Variable { read, .. } => {
                read(record, dst, offset)
            }
        }
    }

    /// Decode this field from `src` at `offset` onto `record`.
    ///
    /// `len` is the recorded byte length for variable fields and ignored
    /// for fixed fields. Returns bytes consumed.
    pub fn decode(
        &self,
        record: &mut T,
        src: &[u8],
        offset: usize,
        len: usize,
    ) -> codec::Result<usize> {
        match &self.kind {
            FieldKind::Fixed { width, write, .. } => {
                write(record, src, offset)?;
                Ok(*width)
            }
            FieldKind::Variable { write, .. } => {
                write(record, src, offset, len)?;
                Ok(len)
            }
        }
    }
}

impl<T> std::fmt::Debug for FieldDef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("variable", &self.is_variable())
            .field("fixed_width", &self.fixed_width())
            .finish()
    }
}

// Variable-field constructors need the getter in both the size and read
// closures; an Arc lets one caller-supplied closure serve both.
fn share<F>(f: F) -> std::sync::Arc<F> {
    std::sync::Arc::new(f)
}
