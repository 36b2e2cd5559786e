//! Box codec - coordinate bounds to the wire region descriptor.
//!
//! A region is sent as one `{start, span}` pair per axis, in the caller's
//! axis order:
//!
//! ```text
//! {"bounds": [{"start": 0, "span": 2}, {"start": 10, "span": 3}]}
//! ```
//!
//! Bounds are inclusive at both ends, so `lower = (0, 10)`,
//! `upper = (1, 12)` produces the box above.
//!
//! # Example
//!
//! ```
//! use dxspaces_client::protocol::{bounds_to_box, shape_to_box, Extent};
//!
//! let region = bounds_to_box(&[0, 10], &[1, 12]).unwrap();
//! assert_eq!(region.bounds, vec![Extent::new(0, 2), Extent::new(10, 3)]);
//!
//! let written = shape_to_box(&[2, 3], &[0, 10]).unwrap();
//! assert_eq!(written.bounds, vec![Extent::new(0, 2), Extent::new(10, 3)]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpaceError};

/// One axis of a region: first index and number of indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    pub start: i64,
    pub span: u64,
}

impl Extent {
    pub const fn new(start: i64, span: u64) -> Self {
        Self { start, span }
    }

    /// Last index covered (inclusive), clamped to the `i64` range.
    /// Meaningless for zero spans.
    pub fn last(&self) -> i64 {
        let last = i128::from(self.start) + i128::from(self.span) - 1;
        i64::try_from(last).unwrap_or(if last < 0 { i64::MIN } else { i64::MAX })
    }
}

/// Rectangular region descriptor as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RegionBox {
    pub bounds: Vec<Extent>,
}

impl RegionBox {
    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.bounds.len()
    }

    /// Span of every axis.
    pub fn shape(&self) -> Vec<u64> {
        self.bounds.iter().map(|e| e.span).collect()
    }

    /// JSON text of the box, as sent in request bodies and form fields.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Build a box from inclusive lower and upper bounds.
///
/// `start[i] = lower[i]`, `span[i] = upper[i] - lower[i] + 1`.
///
/// # Errors
///
/// - [`SpaceError::DimensionMismatch`] if the bounds differ in length
/// - [`SpaceError::InvalidRange`] if any `upper[i] < lower[i]`
pub fn bounds_to_box(lower: &[i64], upper: &[i64]) -> Result<RegionBox> {
    if lower.len() != upper.len() {
        return Err(SpaceError::DimensionMismatch {
            left: lower.len(),
            right: upper.len(),
        });
    }

    let bounds = lower
        .iter()
        .zip(upper)
        .enumerate()
        .map(|(axis, (&lo, &hi))| {
            let invalid = SpaceError::InvalidRange {
                axis,
                lower: lo,
                upper: hi,
            };
            if hi < lo {
                return Err(invalid);
            }
            // i128 so that full-range i64 bounds cannot overflow
            let span = i128::from(hi) - i128::from(lo) + 1;
            let span = u64::try_from(span).map_err(|_| invalid)?;
            Ok(Extent::new(lo, span))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RegionBox { bounds })
}

/// Build a box from an array shape placed at `offset`.
///
/// `start[i] = offset[i]`, `span[i] = shape[i]`. Only the shape is checked
/// for sign; offsets are passed through as given.
///
/// # Errors
///
/// - [`SpaceError::DimensionMismatch`] if shape and offset differ in length
/// - [`SpaceError::NegativeOffset`] if any `shape[i] < 0`
pub fn shape_to_box(shape: &[i64], offset: &[i64]) -> Result<RegionBox> {
    if shape.len() != offset.len() {
        return Err(SpaceError::DimensionMismatch {
            left: shape.len(),
            right: offset.len(),
        });
    }

    let bounds = shape
        .iter()
        .zip(offset)
        .enumerate()
        .map(|(axis, (&extent, &start))| {
            let span = u64::try_from(extent)
                .map_err(|_| SpaceError::NegativeOffset { axis, extent })?;
            Ok(Extent::new(start, span))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RegionBox { bounds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bounds_inclusive() {
        let region = bounds_to_box(&[0, 0], &[1, 2]).unwrap();
        assert_eq!(region.bounds, vec![Extent::new(0, 2), Extent::new(0, 3)]);
        assert_eq!(region.shape(), vec![2, 3]);
    }

    #[test]
    fn test_single_point() {
        let region = bounds_to_box(&[5, -3, 7], &[5, -3, 7]).unwrap();
        assert_eq!(region.ndim(), 3);
        assert!(region.bounds.iter().all(|e| e.span == 1));
        assert_eq!(region.bounds[1].start, -3);
        assert_eq!(region.bounds[1].last(), -3);
    }

    #[test]
    fn test_axis_order_preserved() {
        let region = bounds_to_box(&[9, 1, 5], &[10, 1, 8]).unwrap();
        let starts: Vec<i64> = region.bounds.iter().map(|e| e.start).collect();
        assert_eq!(starts, vec![9, 1, 5]);
        assert_eq!(region.shape(), vec![2, 1, 4]);
    }

    #[test]
    fn test_bounds_dimension_mismatch() {
        match bounds_to_box(&[0, 0], &[1]) {
            Err(SpaceError::DimensionMismatch { left, right }) => {
                assert_eq!((left, right), (2, 1));
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_bounds_inverted_axis() {
        match bounds_to_box(&[0, 4], &[3, 2]) {
            Err(SpaceError::InvalidRange { axis, lower, upper }) => {
                assert_eq!((axis, lower, upper), (1, 4, 2));
            }
            other => panic!("expected invalid range, got {other:?}"),
        }
    }

    #[test]
    fn test_bounds_full_i64_range() {
        let region = bounds_to_box(&[i64::MIN + 1], &[i64::MAX]).unwrap();
        assert_eq!(region.bounds[0].span, u64::MAX);
        assert_eq!(region.bounds[0].last(), i64::MAX);
        assert!(bounds_to_box(&[i64::MIN], &[i64::MAX]).is_err());
    }

    #[test]
    fn test_extent_last_clamps() {
        assert_eq!(Extent::new(10, 3).last(), 12);
        assert_eq!(Extent::new(i64::MAX, 2).last(), i64::MAX);
        assert_eq!(Extent::new(i64::MIN, 0).last(), i64::MIN);
        assert_eq!(Extent::new(-1, u64::MAX).last(), i64::MAX);
    }

    #[test]
    fn test_empty_bounds() {
        let region = bounds_to_box(&[], &[]).unwrap();
        assert_eq!(region.ndim(), 0);
    }

    #[test]
    fn test_shape_to_box() {
        let region = shape_to_box(&[2, 3], &[4, 5]).unwrap();
        assert_eq!(region.bounds, vec![Extent::new(4, 2), Extent::new(5, 3)]);
    }

    #[test]
    fn test_shape_zero_extent_allowed() {
        let region = shape_to_box(&[0], &[3]).unwrap();
        assert_eq!(region.bounds, vec![Extent::new(3, 0)]);
    }

    #[test]
    fn test_shape_negative_offset_passes_through() {
        let region = shape_to_box(&[2], &[-7]).unwrap();
        assert_eq!(region.bounds, vec![Extent::new(-7, 2)]);
    }

    #[test]
    fn test_shape_negative_extent() {
        match shape_to_box(&[2, -1], &[0, 0]) {
            Err(SpaceError::NegativeOffset { axis, extent }) => {
                assert_eq!((axis, extent), (1, -1));
            }
            other => panic!("expected negative extent error, got {other:?}"),
        }
    }

    #[test]
    fn test_shape_dimension_mismatch() {
        assert!(matches!(
            shape_to_box(&[1, 2, 3], &[0, 0]),
            Err(SpaceError::DimensionMismatch { left: 3, right: 2 })
        ));
    }

    #[test]
    fn test_box_json_wire_format() {
        let region = bounds_to_box(&[0, 10], &[1, 12]).unwrap();
        assert_eq!(
            region.to_json().unwrap(),
            r#"{"bounds":[{"start":0,"span":2},{"start":10,"span":3}]}"#
        );

        let parsed: RegionBox = serde_json::from_str(&region.to_json().unwrap()).unwrap();
        assert_eq!(parsed, region);
    }

    fn bounds_pair() -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
        prop::collection::vec((-1_000_000i64..1_000_000, 0i64..10_000), 0..6).prop_map(
            |axes| -> (Vec<i64>, Vec<i64>) {
                axes.into_iter().map(|(lo, len)| (lo, lo + len)).unzip()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_bounds_start_and_span((lower, upper) in bounds_pair()) {
            let region = bounds_to_box(&lower, &upper).unwrap();
            prop_assert_eq!(region.ndim(), lower.len());
            for (i, extent) in region.bounds.iter().enumerate() {
                prop_assert_eq!(extent.start, lower[i]);
                prop_assert_eq!(extent.span as i64, upper[i] - lower[i] + 1);
            }
        }

        #[test]
        fn prop_mismatched_lengths_always_fail(
            lower in prop::collection::vec(any::<i64>(), 0..6),
            upper in prop::collection::vec(any::<i64>(), 0..6),
        ) {
            prop_assume!(lower.len() != upper.len());
            let is_mismatch = matches!(
                bounds_to_box(&lower, &upper),
                Err(SpaceError::DimensionMismatch { .. })
            );
            prop_assert!(is_mismatch);
        }

        #[test]
        fn prop_any_inverted_axis_fails(
            (lower, mut upper) in bounds_pair(),
            gap in 1i64..1000,
            at in any::<prop::sample::Index>(),
        ) {
            prop_assume!(!lower.is_empty());
            let axis = at.index(lower.len());
            upper[axis] = lower[axis] - gap;
            let is_invalid = matches!(
                bounds_to_box(&lower, &upper),
                Err(SpaceError::InvalidRange { .. })
            );
            prop_assert!(is_invalid);
        }

        #[test]
        fn prop_shape_fails_iff_negative(
            axes in prop::collection::vec((-5i64..50, any::<i64>()), 0..6),
        ) {
            let (shape, offset): (Vec<i64>, Vec<i64>) = axes.into_iter().unzip();
            let has_negative = shape.iter().any(|&s| s < 0);
            match shape_to_box(&shape, &offset) {
                Err(SpaceError::NegativeOffset { .. }) => prop_assert!(has_negative),
                Ok(region) => {
                    prop_assert!(!has_negative);
                    for (i, extent) in region.bounds.iter().enumerate() {
                        prop_assert_eq!(extent.start, offset[i]);
                        prop_assert_eq!(extent.span as i64, shape[i]);
                    }
                }
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }
    }
}
