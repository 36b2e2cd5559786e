//! Array transfer codec - typed n-dimensional arrays to and from raw payloads.
//!
//! An array travels as `{bytes, type tag, element size, dimensions}`. The
//! bytes are the elements in row-major order, native byte order, with no
//! padding and no compression. Dimensions and tag travel out of band (query
//! parameters on write, `x-ds-dims` / `x-ds-tag` headers on read).
//!
//! # Example
//!
//! ```
//! use dxspaces_client::codec::{NdArrayCodec, TypeTag};
//! use ndarray::array;
//!
//! let encoded = NdArrayCodec::encode(&array![[1i32, 2, 3], [4, 5, 6]]);
//! assert_eq!(encoded.tag, TypeTag(5));
//! assert_eq!(encoded.dims, vec![2, 3]);
//! assert_eq!(encoded.data.len(), 24);
//!
//! let decoded = NdArrayCodec::decode(&encoded.dims, encoded.tag, encoded.data.clone()).unwrap();
//! assert_eq!(decoded.to_vec::<i32>().unwrap(), vec![1, 2, 3, 4, 5, 6]);
//! ```

use bytes::Bytes;
use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn};

use super::tag::{Element, ElementLayout, ElementType, TypeTag, TypeTagTable};
use crate::error::{Result, SpaceError};

/// An array serialized for transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedArray {
    /// Row-major element bytes.
    pub data: Bytes,
    /// Element type tag.
    pub tag: TypeTag,
    /// Element size in bytes.
    pub element_size: usize,
    /// Extent of each axis.
    pub dims: Vec<usize>,
}

/// Decoded payload of a region read.
///
/// Owns its bytes; typed access goes through [`TypedArray::to_vec`] or
/// [`TypedArray::to_ndarray`] for any [`Element`] type.
///
/// `float16`, `complex64` and `complex128` payloads decode and re-encode
/// like any other, but have no typed view: read them through
/// [`TypedArray::as_bytes`]. To write such data, build an [`EncodedArray`]
/// with the right tag and element size by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedArray {
    dims: Vec<usize>,
    tag: TypeTag,
    layout: ElementLayout,
    data: Bytes,
}

impl TypedArray {
    /// Extent of each axis.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        element_count(&self.dims)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tag as received from the server.
    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    pub fn layout(&self) -> ElementLayout {
        self.layout
    }

    pub fn element_type(&self) -> ElementType {
        self.layout.element_type
    }

    pub fn element_size(&self) -> usize {
        self.layout.size
    }

    /// Raw row-major bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Elements in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::ElementTypeMismatch`] if `T` is not the
    /// payload's element type.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        self.check_element::<T>()?;
        Ok(self
            .data
            .chunks_exact(self.layout.size)
            .map(T::read_ne)
            .collect())
    }

    /// Elements as a dynamic-dimensional `ndarray`.
    pub fn to_ndarray<T: Element>(&self) -> Result<ArrayD<T>> {
        let values = self.to_vec::<T>()?;
        let actual = values.len();
        ArrayD::from_shape_vec(IxDyn(&self.dims), values).map_err(|_| {
            SpaceError::PayloadLengthMismatch {
                expected: self.len(),
                actual,
            }
        })
    }

    fn check_element<T: Element>(&self) -> Result<()> {
        if T::ELEMENT_TYPE != self.layout.element_type {
            return Err(SpaceError::ElementTypeMismatch {
                actual: self.layout.element_type.name(),
                requested: T::ELEMENT_TYPE.name(),
            });
        }
        Ok(())
    }
}

/// Anything that can be written to a region.
pub trait EncodeArray {
    fn encode_array(&self) -> EncodedArray;
}

impl<T, S, D> EncodeArray for ArrayBase<S, D>
where
    T: Element,
    S: Data<Elem = T>,
    D: Dimension,
{
    fn encode_array(&self) -> EncodedArray {
        NdArrayCodec::encode(self)
    }
}

impl EncodeArray for TypedArray {
    fn encode_array(&self) -> EncodedArray {
        EncodedArray {
            data: self.data.clone(),
            tag: self.tag,
            element_size: self.layout.size,
            dims: self.dims.clone(),
        }
    }
}

impl EncodeArray for EncodedArray {
    fn encode_array(&self) -> EncodedArray {
        self.clone()
    }
}

/// Codec between `ndarray` arrays and transfer payloads.
pub struct NdArrayCodec;

impl NdArrayCodec {
    /// Serialize an array in logical row-major order.
    ///
    /// Non-contiguous views (transposes, slices) are walked in index order,
    /// so the payload always matches `array.shape()`.
    pub fn encode<T, S, D>(array: &ArrayBase<S, D>) -> EncodedArray
    where
        T: Element,
        S: Data<Elem = T>,
        D: Dimension,
    {
        let element_type = T::ELEMENT_TYPE;
        let mut data = Vec::with_capacity(array.len() * element_type.size());
        for value in array.iter() {
            value.write_ne(&mut data);
        }

        EncodedArray {
            data: Bytes::from(data),
            tag: TypeTagTable::tag_of(element_type),
            element_size: element_type.size(),
            dims: array.shape().to_vec(),
        }
    }

    /// Reconstruct an array of shape `dims` over `data`.
    ///
    /// # Errors
    ///
    /// - [`SpaceError::UnknownTypeTag`] if `tag` is not in the tag table
    /// - [`SpaceError::PayloadLengthMismatch`] if `data` is not exactly
    ///   `product(dims) * element_size` bytes
    pub fn decode(dims: &[usize], tag: TypeTag, data: Bytes) -> Result<TypedArray> {
        let layout = TypeTagTable::lookup(tag)?;

        let expected = element_count(dims).saturating_mul(layout.size);
        if data.len() != expected {
            return Err(SpaceError::PayloadLengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(TypedArray {
            dims: dims.to_vec(),
            tag,
            layout,
            data,
        })
    }
}

fn element_count(dims: &[usize]) -> usize {
    dims.iter().fold(1usize, |acc, &d| acc.saturating_mul(d))
}
