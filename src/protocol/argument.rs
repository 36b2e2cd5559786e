//! Region arguments for remote execution.

use super::bbox::{bounds_to_box, RegionBox};
use crate::error::Result;

/// A named, versioned rectangular region, addressed by inclusive bounds.
///
/// `lower_bound` and `upper_bound` must have the same length; this is
/// checked when the argument is converted to a box, before any request
/// is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub version: u32,
    pub lower_bound: Vec<i64>,
    pub upper_bound: Vec<i64>,
    pub namespace: Option<String>,
}

impl Argument {
    /// Create an argument in the default namespace.
    pub fn new(
        name: impl Into<String>,
        version: u32,
        lower_bound: impl Into<Vec<i64>>,
        upper_bound: impl Into<Vec<i64>>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            lower_bound: lower_bound.into(),
            upper_bound: upper_bound.into(),
            namespace: None,
        }
    }

    /// Scope the argument to a namespace.
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Wire box for this argument's bounds.
    pub fn to_box(&self) -> Result<RegionBox> {
        bounds_to_box(&self.lower_bound, &self.upper_bound)
    }
}
