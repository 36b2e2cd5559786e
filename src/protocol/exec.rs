//! Remote execution request marshalling.
//!
//! An execution request has two parts:
//!
//! - `requests`: JSON metadata listing the argument regions, in order
//! - `fn`: the executable, as an opaque MessagePack blob
//!
//! ```text
//! {"requests": [
//!     {"name": "a", "version": 1, "bounds": [{"start": 0, "span": 4}]},
//!     {"name": "b", "version": 2, "bounds": [{"start": 0, "span": 4}], "namespace": "sim"}
//! ]}
//! ```
//!
//! The server binds regions to the executable's parameters by position, so
//! the order of `requests` is the order of the caller's arguments.
//!
//! The executable is not code: it is any serde-serializable value the
//! server knows how to interpret, typically an [`Operation`] naming an
//! operation the server has registered. Client and server must agree on
//! both the operation set and the blob encoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::argument::Argument;
use super::bbox::Extent;
use crate::codec::MsgPackCodec;
use crate::error::Result;

/// One argument region as listed in the request metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRequest {
    pub name: String,
    pub version: u32,
    pub bounds: Vec<Extent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Execution metadata: `{"requests": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecRequest {
    pub requests: Vec<ObjectRequest>,
}

/// Wire-ready execution request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecPayload {
    /// JSON text for the `requests` form field.
    pub metadata: String,
    /// Executable blob for the `fn` file part.
    pub blob: Vec<u8>,
}

/// A named server-side operation with structured parameters.
///
/// # Example
///
/// ```
/// use dxspaces_client::protocol::Operation;
/// use serde_json::json;
///
/// let op = Operation::new("reduce").with_params(json!({"op": "sum", "axis": 0}));
/// assert_eq!(op.name, "reduce");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub params: Value,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Value::Null,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }
}

/// Builds execution requests and decodes their results.
pub struct ExecMarshaller;

impl ExecMarshaller {
    /// Build the execution metadata for `arguments`, in order.
    ///
    /// # Errors
    ///
    /// Fails with the box errors of the first argument whose bounds are
    /// invalid; nothing is built in that case.
    pub fn build_metadata(arguments: &[Argument]) -> Result<ExecRequest> {
        let requests = arguments
            .iter()
            .map(|arg| {
                Ok(ObjectRequest {
                    name: arg.name.clone(),
                    version: arg.version,
                    bounds: arg.to_box()?.bounds,
                    namespace: arg.namespace.clone().filter(|ns| !ns.is_empty()),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ExecRequest { requests })
    }

    /// Build the complete request: JSON metadata plus executable blob.
    pub fn build_request<E>(arguments: &[Argument], executable: &E) -> Result<ExecPayload>
    where
        E: Serialize + ?Sized,
    {
        let metadata = serde_json::to_string(&Self::build_metadata(arguments)?)?;
        let blob = MsgPackCodec::encode(executable)?;
        Ok(ExecPayload { metadata, blob })
    }

    /// Decode a result blob returned by the server.
    pub fn decode_result<T: DeserializeOwned>(blob: &[u8]) -> Result<T> {
        MsgPackCodec::decode(blob)
    }
}
