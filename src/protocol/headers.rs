//! Response header contract for region reads.
//!
//! A successful read carries the region's dimensions and element type in
//! two headers:
//!
//! ```text
//! x-ds-dims: 2,3
//! x-ds-tag: 5
//! ```

use crate::codec::TypeTag;
use crate::error::{Result, SpaceError};

/// Comma-separated dimensions of the returned region.
pub const DIMS_HEADER: &str = "x-ds-dims";

/// Type tag of the returned elements.
pub const TAG_HEADER: &str = "x-ds-tag";

/// Parse an `x-ds-dims` value.
pub fn parse_dims(value: &str) -> Result<Vec<usize>> {
    value
        .split(',')
        .map(|d| d.trim().parse::<usize>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| SpaceError::MalformedHeader {
            name: DIMS_HEADER,
            value: value.to_string(),
        })
}

/// Format dimensions as an `x-ds-dims` value.
pub fn format_dims(dims: &[usize]) -> String {
    dims.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse an `x-ds-tag` value.
pub fn parse_tag(value: &str) -> Result<TypeTag> {
    value
        .trim()
        .parse::<i32>()
        .map(TypeTag)
        .map_err(|_| SpaceError::MalformedHeader {
            name: TAG_HEADER,
            value: value.to_string(),
        })
}
