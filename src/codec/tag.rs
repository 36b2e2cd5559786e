//! Type tag table - the element layouts shared with the server.
//!
//! Every array payload on the wire is tagged with a numeric type code. The
//! code space is defined by the server (it follows numpy's `dtype.num`
//! numbering) and is a versioned contract: adding, removing or renumbering
//! an entry here without the server doing the same is a protocol break.
//!
//! ```text
//! tag  layout        tag  layout
//!  0   bool   (1)     8   uint64  (8)   alias 10
//!  1   int8   (1)    11   float32 (4)
//!  2   uint8  (1)    12   float64 (8)
//!  3   int16  (2)    14   complex64  (8)
//!  4   uint16 (2)    15   complex128 (16)
//!  5   int32  (4)    23   float16 (2)
//!  6   uint32 (4)
//!  7   int64  (8)    alias 9
//! ```
//!
//! Tags 13 and 16 (long double and its complex form) are platform dependent
//! on the server side and are deliberately absent.
//!
//! # Example
//!
//! ```
//! use dxspaces_client::codec::{ElementType, TypeTag, TypeTagTable};
//!
//! let layout = TypeTagTable::lookup(TypeTag(5)).unwrap();
//! assert_eq!(layout.element_type, ElementType::Int32);
//! assert_eq!(layout.size, 4);
//! assert_eq!(TypeTagTable::tag_of(ElementType::Int32), TypeTag(5));
//! assert!(TypeTagTable::lookup(TypeTag(13)).is_err());
//! ```

use std::fmt;

use crate::error::{Result, SpaceError};

/// Numeric element type code as carried in `x-ds-tag` and `element_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(pub i32);

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Semantic family of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Bool,
    SignedInt,
    UnsignedInt,
    Float,
    Complex,
}

/// Every element type the tag table knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float16,
    Float32,
    Float64,
    Complex64,
    Complex128,
}

impl ElementType {
    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            ElementType::Bool | ElementType::Int8 | ElementType::UInt8 => 1,
            ElementType::Int16 | ElementType::UInt16 | ElementType::Float16 => 2,
            ElementType::Int32 | ElementType::UInt32 | ElementType::Float32 => 4,
            ElementType::Int64
            | ElementType::UInt64
            | ElementType::Float64
            | ElementType::Complex64 => 8,
            ElementType::Complex128 => 16,
        }
    }

    /// Semantic family of this element type.
    pub const fn kind(self) -> ElementKind {
        match self {
            ElementType::Bool => ElementKind::Bool,
            ElementType::Int8 | ElementType::Int16 | ElementType::Int32 | ElementType::Int64 => {
                ElementKind::SignedInt
            }
            ElementType::UInt8
            | ElementType::UInt16
            | ElementType::UInt32
            | ElementType::UInt64 => ElementKind::UnsignedInt,
            ElementType::Float16 | ElementType::Float32 | ElementType::Float64 => {
                ElementKind::Float
            }
            ElementType::Complex64 | ElementType::Complex128 => ElementKind::Complex,
        }
    }

    /// Lowercase name, matching the server's dtype names.
    pub const fn name(self) -> &'static str {
        match self {
            ElementType::Bool => "bool",
            ElementType::Int8 => "int8",
            ElementType::UInt8 => "uint8",
            ElementType::Int16 => "int16",
            ElementType::UInt16 => "uint16",
            ElementType::Int32 => "int32",
            ElementType::UInt32 => "uint32",
            ElementType::Int64 => "int64",
            ElementType::UInt64 => "uint64",
            ElementType::Float16 => "float16",
            ElementType::Float32 => "float32",
            ElementType::Float64 => "float64",
            ElementType::Complex64 => "complex64",
            ElementType::Complex128 => "complex128",
        }
    }

    /// Layout descriptor for this element type.
    pub const fn layout(self) -> ElementLayout {
        ElementLayout {
            element_type: self,
            kind: self.kind(),
            size: self.size(),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary layout of one element: size plus semantic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementLayout {
    pub element_type: ElementType,
    pub kind: ElementKind,
    /// Element size in bytes (always positive).
    pub size: usize,
}

/// Tag table entries. Tags 9 and 10 are aliases accepted on decode only.
const TAG_TABLE: &[(i32, ElementType)] = &[
    (0, ElementType::Bool),
    (1, ElementType::Int8),
    (2, ElementType::UInt8),
    (3, ElementType::Int16),
    (4, ElementType::UInt16),
    (5, ElementType::Int32),
    (6, ElementType::UInt32),
    (7, ElementType::Int64),
    (8, ElementType::UInt64),
    (9, ElementType::Int64),
    (10, ElementType::UInt64),
    (11, ElementType::Float32),
    (12, ElementType::Float64),
    (14, ElementType::Complex64),
    (15, ElementType::Complex128),
    (23, ElementType::Float16),
];

/// Bidirectional lookup between [`TypeTag`] and [`ElementLayout`].
///
/// Unknown tags are an error, never a best guess.
pub struct TypeTagTable;

impl TypeTagTable {
    /// Layout for a tag received from the server.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::UnknownTypeTag`] if the tag is not in the table.
    pub fn lookup(tag: TypeTag) -> Result<ElementLayout> {
        TAG_TABLE
            .iter()
            .find(|(code, _)| *code == tag.0)
            .map(|(_, ty)| ty.layout())
            .ok_or(SpaceError::UnknownTypeTag(tag.0))
    }

    /// Canonical tag for an element type. Must agree with `TAG_TABLE`.
    pub const fn tag_of(element_type: ElementType) -> TypeTag {
        TypeTag(match element_type {
            ElementType::Bool => 0,
            ElementType::Int8 => 1,
            ElementType::UInt8 => 2,
            ElementType::Int16 => 3,
            ElementType::UInt16 => 4,
            ElementType::Int32 => 5,
            ElementType::UInt32 => 6,
            ElementType::Int64 => 7,
            ElementType::UInt64 => 8,
            ElementType::Float32 => 11,
            ElementType::Float64 => 12,
            ElementType::Complex64 => 14,
            ElementType::Complex128 => 15,
            ElementType::Float16 => 23,
        })
    }

    /// All tags the table accepts, in ascending order.
    pub fn tags() -> impl Iterator<Item = TypeTag> {
        TAG_TABLE.iter().map(|(code, _)| TypeTag(*code))
    }
}

/// A Rust scalar that can be carried in an array payload.
///
/// Values are written and read in native byte order. `float16`,
/// `complex64` and `complex128` have no std scalar and no impl; payloads of
/// those types are handled as raw bytes (see [`TypedArray`]).
///
/// [`TypedArray`]: crate::codec::TypedArray
pub trait Element: Copy + 'static {
    /// Element type this scalar maps to.
    const ELEMENT_TYPE: ElementType;

    /// Append the native-endian bytes of this value.
    fn write_ne(&self, out: &mut Vec<u8>);

    /// Read a value from exactly `ELEMENT_TYPE.size()` bytes.
    fn read_ne(bytes: &[u8]) -> Self;
}

macro_rules! impl_numeric_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const ELEMENT_TYPE: ElementType = ElementType::$variant;

                #[inline]
                fn write_ne(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_ne_bytes());
                }

                #[inline]
                fn read_ne(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(buf)
                }
            }
        )*
    };
}

impl_numeric_element! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

impl Element for bool {
    const ELEMENT_TYPE: ElementType = ElementType::Bool;

    #[inline]
    fn write_ne(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }

    #[inline]
    fn read_ne(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::NdArrayCodec;
    use bytes::Bytes;
    use proptest::prelude::*;

    const ALL_TYPES: [ElementType; 14] = [
        ElementType::Bool,
        ElementType::Int8,
        ElementType::UInt8,
        ElementType::Int16,
        ElementType::UInt16,
        ElementType::Int32,
        ElementType::UInt32,
        ElementType::Int64,
        ElementType::UInt64,
        ElementType::Float16,
        ElementType::Float32,
        ElementType::Float64,
        ElementType::Complex64,
        ElementType::Complex128,
    ];

    #[test]
    fn test_canonical_tags() {
        assert_eq!(TypeTagTable::tag_of(ElementType::Bool), TypeTag(0));
        assert_eq!(TypeTagTable::tag_of(ElementType::Int32), TypeTag(5));
        assert_eq!(TypeTagTable::tag_of(ElementType::Int64), TypeTag(7));
        assert_eq!(TypeTagTable::tag_of(ElementType::UInt64), TypeTag(8));
        assert_eq!(TypeTagTable::tag_of(ElementType::Float32), TypeTag(11));
        assert_eq!(TypeTagTable::tag_of(ElementType::Float64), TypeTag(12));
        assert_eq!(TypeTagTable::tag_of(ElementType::Float16), TypeTag(23));
    }

    #[test]
    fn test_every_type_survives_inverse_lookup() {
        for ty in ALL_TYPES {
            let layout = TypeTagTable::lookup(TypeTagTable::tag_of(ty)).unwrap();
            assert_eq!(layout.element_type, ty);
            assert_eq!(layout.size, ty.size());
            assert!(layout.size > 0);
        }
    }

    #[test]
    fn test_canonical_tag_is_first_table_entry() {
        for ty in ALL_TYPES {
            let first = TAG_TABLE.iter().find(|(_, t)| *t == ty).unwrap().0;
            assert_eq!(TypeTagTable::tag_of(ty), TypeTag(first));
        }
    }

    #[test]
    fn test_aliases_resolve_to_64_bit_integers() {
        assert_eq!(
            TypeTagTable::lookup(TypeTag(9)).unwrap().element_type,
            ElementType::Int64
        );
        assert_eq!(
            TypeTagTable::lookup(TypeTag(10)).unwrap().element_type,
            ElementType::UInt64
        );
    }

    #[test]
    fn test_every_listed_tag_resolves() {
        let tags: Vec<TypeTag> = TypeTagTable::tags().collect();
        assert_eq!(tags.len(), 16);
        assert!(tags.windows(2).all(|w| w[0] < w[1]));
        for tag in tags {
            assert!(TypeTagTable::lookup(tag).is_ok());
        }
    }

    #[test]
    fn test_long_double_tags_rejected() {
        for code in [13, 16] {
            assert!(matches!(
                TypeTagTable::lookup(TypeTag(code)),
                Err(SpaceError::UnknownTypeTag(c)) if c == code
            ));
        }
    }

    proptest! {
        #[test]
        fn prop_decode_rejects_every_unlisted_tag(
            code in any::<i32>().prop_filter("listed tag", |c| {
                !TypeTagTable::tags().any(|t| t == TypeTag(*c))
            }),
            len in 0usize..64,
        ) {
            let result = NdArrayCodec::decode(&[len], TypeTag(code), Bytes::from(vec![0u8; len]));
            let rejected = matches!(result, Err(SpaceError::UnknownTypeTag(c)) if c == code);
            prop_assert!(rejected);
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ElementType::Int16.kind(), ElementKind::SignedInt);
        assert_eq!(ElementType::UInt32.kind(), ElementKind::UnsignedInt);
        assert_eq!(ElementType::Float16.kind(), ElementKind::Float);
        assert_eq!(ElementType::Complex128.kind(), ElementKind::Complex);
        assert_eq!(ElementType::Bool.kind(), ElementKind::Bool);
    }

    #[test]
    fn test_element_native_bytes() {
        let mut out = Vec::new();
        (-2i32).write_ne(&mut out);
        assert_eq!(out, (-2i32).to_ne_bytes());
        assert_eq!(i32::read_ne(&out), -2);

        let mut out = Vec::new();
        true.write_ne(&mut out);
        false.write_ne(&mut out);
        assert_eq!(out, vec![1, 0]);
        assert!(bool::read_ne(&out[..1]));
        assert!(!bool::read_ne(&out[1..]));
    }

    #[test]
    fn test_element_sizes_match_rust_types() {
        assert_eq!(i8::ELEMENT_TYPE.size(), std::mem::size_of::<i8>());
        assert_eq!(u16::ELEMENT_TYPE.size(), std::mem::size_of::<u16>());
        assert_eq!(i32::ELEMENT_TYPE.size(), std::mem::size_of::<i32>());
        assert_eq!(u64::ELEMENT_TYPE.size(), std::mem::size_of::<u64>());
        assert_eq!(f32::ELEMENT_TYPE.size(), std::mem::size_of::<f32>());
        assert_eq!(f64::ELEMENT_TYPE.size(), std::mem::size_of::<f64>());
    }
}
