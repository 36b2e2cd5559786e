//! MsgPack codec using `rmp-serde` - the opaque-object protocol.
//!
//! Executables shipped to the server and the results it sends back travel
//! as self-describing MessagePack blobs. The client never looks inside
//! them; it only needs both ends to agree on the encoding.
//!
//! Always use `to_vec_named`: structs are encoded as maps keyed by field
//! name, so the server can decode them without knowing the Rust field order.
//!
//! # Example
//!
//! ```
//! use dxspaces_client::codec::MsgPackCodec;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Reduce {
//!     op: String,
//!     axis: u32,
//! }
//!
//! let reduce = Reduce { op: "sum".to_string(), axis: 0 };
//! let blob = MsgPackCodec::encode(&reduce).unwrap();
//! let back: Reduce = MsgPackCodec::decode(&blob).unwrap();
//! assert_eq!(back, reduce);
//! ```

use crate::error::Result;

/// MessagePack codec for executable and result blobs.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes (struct-as-map).
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpaceError;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Stencil {
        name: String,
        radius: u32,
        weights: Vec<f64>,
    }

    #[test]
    fn test_struct_encodes_as_map() {
        let stencil = Stencil {
            name: "blur".to_string(),
            radius: 1,
            weights: vec![0.25, 0.5, 0.25],
        };

        let encoded = MsgPackCodec::encode(&stencil).unwrap();

        // fixmap with 3 entries; positional encoding would be 0x93
        assert_eq!(encoded[0], 0x83);
        let decoded: Stencil = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, stencil);
    }

    #[test]
    fn test_scalar_results() {
        let encoded = MsgPackCodec::encode(&-42i32).unwrap();
        assert_eq!(MsgPackCodec::decode::<i64>(&encoded).unwrap(), -42);

        let encoded = MsgPackCodec::encode(&2.5f64).unwrap();
        assert_eq!(MsgPackCodec::decode::<f64>(&encoded).unwrap(), 2.5);
    }

    #[test]
    fn test_unit_and_none_are_nil() {
        assert_eq!(MsgPackCodec::encode(&()).unwrap(), vec![0xc0]);
        assert_eq!(MsgPackCodec::encode(&None::<u8>).unwrap(), vec![0xc0]);
    }

    #[test]
    fn test_binary_result() {
        let data: Vec<u8> = vec![0x01, 0x02, 0x03];
        let encoded = MsgPackCodec::encode(&serde_bytes::Bytes::new(&data)).unwrap();

        // bin8
        assert_eq!(encoded[0], 0xc4);
        let decoded: serde_bytes::ByteBuf = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded.as_ref(), &data[..]);
    }

    #[test]
    fn test_decode_error_on_invalid_data() {
        let result: Result<Stencil> = MsgPackCodec::decode(b"not msgpack");
        assert!(matches!(result, Err(SpaceError::MsgPackDecode(_))));
    }
}
