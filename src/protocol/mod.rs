//! Protocol module - request and response shapes of the space's HTTP API.
//!
//! This module implements the JSON side of the protocol:
//! - Region boxes built from bounds or shape + offset
//! - Execution metadata and executable blobs
//! - Registry handles and the read response headers

mod argument;
mod bbox;
mod exec;
mod handle;
mod headers;

pub use argument::Argument;
pub use bbox::{bounds_to_box, shape_to_box, Extent, RegionBox};
pub use exec::{ExecMarshaller, ExecPayload, ExecRequest, ObjectRequest, Operation};
pub use handle::RegistryHandle;
pub use headers::{format_dims, parse_dims, parse_tag, DIMS_HEADER, TAG_HEADER};
