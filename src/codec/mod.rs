//! Codec module - binary payloads exchanged with the space.
//!
//! - [`TypeTagTable`] - numeric type tags shared with the server
//! - [`NdArrayCodec`] - array payloads (row-major bytes + tag + dims)
//! - [`MsgPackCodec`] - opaque executable and result blobs (`rmp-serde`)
//!
//! # Design
//!
//! Codecs are marker structs with static methods rather than trait objects,
//! matching the way the client calls them: one fixed codec per payload kind.

mod array;
mod msgpack;
mod tag;

pub use array::{EncodeArray, EncodedArray, NdArrayCodec, TypedArray};
pub use msgpack::MsgPackCodec;
pub use tag::{Element, ElementKind, ElementLayout, ElementType, TypeTag, TypeTagTable};
