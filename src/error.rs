//! Error types for dxspaces-client.

use thiserror::Error;

/// Main error type for all space operations.
///
/// A read miss is not an error: operations with lookup semantics return
/// `Ok(None)` when the server reports not-found.
#[derive(Debug, Error)]
pub enum SpaceError {
    /// Lower and upper bound (or shape and offset) differ in dimensionality.
    #[error("dimension mismatch: {left} vs {right} dimensions")]
    DimensionMismatch { left: usize, right: usize },

    /// An upper bound lies below its lower bound.
    #[error("invalid range on axis {axis}: upper bound {upper} < lower bound {lower}")]
    InvalidRange { axis: usize, lower: i64, upper: i64 },

    /// A shape extent is negative.
    #[error("negative extent {extent} on axis {axis}")]
    NegativeOffset { axis: usize, extent: i64 },

    /// Type tag not present in the shared tag table.
    #[error("unknown type tag: {0}")]
    UnknownTypeTag(i32),

    /// Payload length does not match dimensions times element size.
    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    PayloadLengthMismatch { expected: usize, actual: usize },

    /// Non-success, non-404 response from the server.
    #[error("request to server failed with {status}: {detail}")]
    ServerError { status: u16, detail: String },

    /// Server reported not-found for a region write.
    #[error("write of {name}/{version} failed: server reported not found")]
    WriteFailed { name: String, version: u32 },

    /// Server reported not-found for a remote execution.
    #[error("remote execution failed: server reported not found")]
    ExecutionFailed,

    /// Server reported not-found for a listing query.
    #[error("not found: {0}")]
    NotFound(String),

    /// Required response header is absent.
    #[error("missing response header: {0}")]
    MissingHeader(&'static str),

    /// Response header could not be parsed.
    #[error("malformed response header {name}: {value:?}")]
    MalformedHeader { name: &'static str, value: String },

    /// Typed view requested for a payload of another element type.
    #[error("element type mismatch: payload is {actual}, requested {requested}")]
    ElementTypeMismatch {
        actual: &'static str,
        requested: &'static str,
    },

    /// Client configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization error (box, metadata, listings).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// MsgPack serialization error (executable blob).
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error (execution result).
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias using SpaceError.
pub type Result<T> = std::result::Result<T, SpaceError>;
